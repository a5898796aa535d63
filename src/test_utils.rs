//! Test utilities for Evently
//!
//! This module provides an in-memory event repository and fixtures for
//! exercising the HTTP layer without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::db::repository::{Repository, RepositoryError, RepositoryResult};
use crate::db::EventRepository;
use crate::models::{EventMode, EventRecord, NewEvent, RawEvent};

/// In-memory implementation of EventRepository
///
/// Enforces slug uniqueness the same way the database index does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<Mutex<Vec<EventRecord>>>,
    fail_next: Arc<Mutex<Option<String>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the repository to fail on the next operation
    pub fn fail_next_operation(&self, error_message: &str) {
        *lock(&self.fail_next) = Some(error_message.to_string());
    }

    /// Snapshot of every stored event in insertion order
    pub fn all_events(&self) -> Vec<EventRecord> {
        lock(&self.events).clone()
    }

    fn check_failure(&self) -> RepositoryResult<()> {
        match lock(&self.fail_next).take() {
            Some(message) => Err(RepositoryError::Connection(message)),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn page(records: impl Iterator<Item = EventRecord>, limit: i64, offset: i64) -> Vec<EventRecord> {
    records
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Repository for InMemoryEventRepository {
    type Entity = EventRecord;
    type Id = Uuid;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<EventRecord>> {
        self.check_failure()?;
        Ok(lock(&self.events).iter().find(|e| e.id == id).cloned())
    }

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool> {
        self.check_failure()?;
        Ok(lock(&self.events).iter().any(|e| e.id == id))
    }

    async fn count(&self) -> RepositoryResult<i64> {
        self.check_failure()?;
        Ok(lock(&self.events).len() as i64)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        self.check_failure()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: NewEvent) -> RepositoryResult<EventRecord> {
        self.check_failure()?;
        let mut events = lock(&self.events);
        if events.iter().any(|e| e.slug == event.slug) {
            return Err(RepositoryError::DuplicateSlug(event.slug));
        }

        let now = Utc::now();
        let record = EventRecord::from_new(Uuid::new_v4(), event, now, now);
        events.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, event: NewEvent) -> RepositoryResult<EventRecord> {
        self.check_failure()?;
        let mut events = lock(&self.events);
        if events.iter().any(|e| e.slug == event.slug && e.id != id) {
            return Err(RepositoryError::DuplicateSlug(event.slug));
        }

        let stored = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("event {}", id)))?;
        *stored = EventRecord::from_new(id, event, stored.created_at, Utc::now());
        Ok(stored.clone())
    }

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<EventRecord>> {
        self.check_failure()?;
        Ok(lock(&self.events).iter().find(|e| e.slug == slug).cloned())
    }

    async fn find_by_date_and_mode(
        &self,
        date: &str,
        mode: EventMode,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<EventRecord>> {
        self.check_failure()?;
        let mut matching: Vec<_> = lock(&self.events)
            .iter()
            .filter(|e| e.date == date && e.mode == mode)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(page(matching.into_iter(), limit, offset))
    }

    async fn list_recent(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<EventRecord>> {
        self.check_failure()?;
        let events = lock(&self.events).clone();
        Ok(page(events.into_iter().rev(), limit, offset))
    }
}

/// A complete, valid submission
pub fn sample_raw_event(title: &str) -> RawEvent {
    RawEvent {
        title: Some(title.to_string()),
        description: Some("A day of talks and workshops".to_string()),
        overview: Some("Talks, workshops and networking".to_string()),
        image: Some("https://example.com/banner.png".to_string()),
        venue: Some("Main Hall".to_string()),
        location: Some("Lisbon, Portugal".to_string()),
        date: Some("2025-06-12".to_string()),
        time: Some("9:30 AM".to_string()),
        mode: Some("offline".to_string()),
        audience: Some("Developers".to_string()),
        agenda: Some(vec!["Keynote".to_string(), "Workshops".to_string()]),
        organizer: Some("Evently Community".to_string()),
        tags: Some(vec!["Rust".to_string(), "Web".to_string()]),
    }
}

/// A normalized event ready for storage
pub fn sample_new_event(title: &str) -> NewEvent {
    crate::models::prepare_create(sample_raw_event(title))
        .unwrap_or_else(|e| panic!("sample event must be valid: {}", e))
}
