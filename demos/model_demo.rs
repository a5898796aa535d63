//! Demonstration of the Evently validation and normalization pipeline
//!
//! Run with: cargo run --example model_demo

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use evently::{
    models::{derive_slug, normalize_date, normalize_time},
    prepare_create, prepare_update, EventRecord, RawEvent,
};

fn main() {
    println!("=== Evently Pipeline Demo ===\n");

    demo_json_submission();
    println!();

    demo_form_submission();
    println!();

    demo_invalid_submissions();
    println!();

    demo_normalizers();
    println!();

    demo_update();
}

fn demo_json_submission() {
    println!("📅 Demo 1: JSON Submission");
    println!("--------------------------");

    let json_data = json!({
        "title": "  Hello, World! 2024 ",
        "description": "A first look at the new release",
        "overview": "Launch party",
        "image": "https://example.com/launch.png",
        "venue": "Main Stage",
        "location": "Amsterdam",
        "date": "March 15, 2024",
        "time": "1:05 PM",
        "mode": "hybrid",
        "audience": "Everyone",
        "agenda": ["Doors", "Keynote"],
        "organizer": "Release Team",
        "tags": ["  AI ", "Cloud"]
    });

    println!("Input JSON:");
    println!("{}", serde_json::to_string_pretty(&json_data).unwrap());

    let raw: RawEvent = serde_json::from_value(json_data).unwrap();
    match prepare_create(raw) {
        Ok(event) => {
            println!("\nNormalized Event:");
            println!("  Title: {}", event.title);
            println!("  Slug:  {}", event.slug);
            println!("  Date:  {}", event.date);
            println!("  Time:  {}", event.time);
            println!("  Mode:  {}", event.mode);
            println!("  Tags:  {:?}", event.tags);
        },
        Err(e) => println!("  ❌ {}", e),
    }
}

fn demo_form_submission() {
    println!("📝 Demo 2: Form Submission");
    println!("--------------------------");

    let fields = vec![
        ("title", "Rust & Coffee"),
        ("description", "Morning meetup"),
        ("overview", "Coffee and code"),
        ("image", "https://example.com/coffee.png"),
        ("venue", "Corner Cafe"),
        ("location", "Zurich"),
        ("date", "2024/11/02"),
        ("time", "8:30 am"),
        ("mode", "offline"),
        ("audience", "Rustaceans"),
        ("agenda", "[\"Coffee\",\"Lightning talks\"]"),
        ("organizer", "Zurich Rust"),
        ("tags[]", "Rust"),
        ("tags[]", "Meetup"),
    ];

    match prepare_create(RawEvent::from_fields(fields)) {
        Ok(event) => {
            println!("  ✓ {} -> /api/events/{}", event.title, event.slug);
            println!("  Agenda: {:?}", event.agenda);
            println!("  When:   {} {}", event.date, event.time);
        },
        Err(e) => println!("  ❌ {}", e),
    }
}

fn demo_invalid_submissions() {
    println!("❌ Demo 3: Invalid Submissions");
    println!("------------------------------");

    let cases = vec![
        ("Empty submission", json!({})),
        (
            "Unknown mode and empty tags",
            json!({
                "title": "Broken", "description": "d", "overview": "o",
                "image": "i", "venue": "v", "location": "l", "date": "2024-01-01",
                "time": "10:00", "mode": "virtual", "audience": "a",
                "agenda": ["x"], "organizer": "o", "tags": []
            }),
        ),
        (
            "Hour out of range",
            json!({
                "title": "Night Owls", "description": "d", "overview": "o",
                "image": "i", "venue": "v", "location": "l", "date": "2024-01-01",
                "time": "25:00", "mode": "online", "audience": "a",
                "agenda": ["x"], "organizer": "o", "tags": ["night"]
            }),
        ),
    ];

    for (name, json_data) in cases {
        let raw: RawEvent = serde_json::from_value(json_data).unwrap();
        match prepare_create(raw) {
            Ok(_) => println!("  {} - unexpectedly accepted", name),
            Err(e) => println!("  {} - {}", name, e),
        }
    }
}

fn demo_normalizers() {
    println!("🔧 Demo 4: Normalizers");
    println!("----------------------");

    for title in ["Hello, World! 2024", "  C++ & Rust: Interop  ", "--already-a-slug--"] {
        println!("  slug({:?}) = {:?}", title, derive_slug(title));
    }

    for date in ["2024-03-15T23:30:00-05:00", "Fri, 15 Mar 2024 10:00:00 GMT", "2024-03", "tomorrow"] {
        match normalize_date(date) {
            Ok(normalized) => println!("  date({:?}) = {:?}", date, normalized),
            Err(e) => println!("  date({:?}) failed: {}", date, e),
        }
    }

    for time in ["12:00 AM", "12:00 PM", "7:45pm", "23:59", "abc"] {
        match normalize_time(time) {
            Ok(normalized) => println!("  time({:?}) = {:?}", time, normalized),
            Err(e) => println!("  time({:?}) failed: {}", time, e),
        }
    }
}

fn demo_update() {
    println!("✏️  Demo 5: Updating a Stored Event");
    println!("----------------------------------");

    let raw = RawEvent::from_fields(vec![
        ("title", "Quarterly Review"),
        ("description", "Numbers and plans"),
        ("overview", "Review"),
        ("image", "https://example.com/q.png"),
        ("venue", "Room 4"),
        ("location", "HQ"),
        ("date", "2024-04-01"),
        ("time", "10:00"),
        ("mode", "online"),
        ("audience", "Staff"),
        ("agenda", "Numbers"),
        ("organizer", "Finance"),
        ("tags", "internal"),
    ]);
    let now = Utc::now();
    let stored = EventRecord::from_new(Uuid::new_v4(), prepare_create(raw).unwrap(), now, now);
    println!("  Stored slug: {}", stored.slug);

    let venue_only = RawEvent::from_fields(vec![("venue", "Room 9")]);
    let updated = prepare_update(&stored, venue_only).unwrap();
    println!("  Venue change keeps slug: {}", updated.slug);

    let renamed = RawEvent::from_fields(vec![("title", "Q2 Review"), ("time", "3:00 PM")]);
    let updated = prepare_update(&stored, renamed).unwrap();
    println!("  Rename derives new slug: {} at {}", updated.slug, updated.time);
}
