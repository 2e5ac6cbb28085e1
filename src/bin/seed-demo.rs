//! Demo account seed script
//!
//! Seeds a demo parent account with realistic data:
//! - 1 user: demo@sproutling.app
//! - 2 children (an infant and a toddler)
//! - 14 days of feeding, sleeping, diaper and temperature events per child,
//!   plus weekly growth measurements and the occasional medication dose
//!
//! Usage:
//!   DATABASE_URL=... DEMO_PASSWORD=Demo2024! ./seed-demo
//!
//! Environment variables:
//!   DATABASE_URL   — PostgreSQL connection string (required)
//!   DEMO_PASSWORD  — Password for the demo account (default: Demo2024!)

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::Rng;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let demo_password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Demo2024!".to_string());

    println!("=== Seed Demo Account ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    sproutling_api::db::run_migrations(&pool).await?;

    // 1. Clean any previous demo account (children/events cascade)
    println!("Cleaning existing demo account...");
    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind("demo@sproutling.app")
        .execute(&pool)
        .await?;

    // 2. Create the demo user
    println!("Creating demo user...");
    let password_hash = bcrypt::hash(&demo_password, 12)?;
    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, first_name, last_name)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind("demo@sproutling.app")
    .bind(&password_hash)
    .bind("Demo")
    .bind("Parent")
    .fetch_one(&pool)
    .await?;

    // 3. Create children
    let today = Utc::now().date_naive();
    let infant_id = create_child(&pool, user_id, "Maya", today - Duration::days(150), "f").await?;
    let toddler_id = create_child(&pool, user_id, "Leo", today - Duration::days(700), "m").await?;
    println!("Created 2 children");

    // 4. Two weeks of events per child
    let mut total = 0usize;
    for day_offset in 0..14 {
        let date = today - Duration::days(day_offset);
        total += seed_day(&pool, infant_id, date, true).await?;
        total += seed_day(&pool, toddler_id, date, false).await?;
    }

    // Weekly growth measurements, newest heavier
    for (child_id, base_kg) in [(infant_id, 6.4), (toddler_id, 11.2)] {
        for week in 0..2 {
            let date = today - Duration::days(week * 7);
            insert_event(
                &pool,
                child_id,
                "growth",
                at(date, 9, 0),
                Some(base_kg - week as f64 * 0.15),
                Some("kg"),
                json!({ "height_cm": 62.0 + (1 - week) as f64 }),
            )
            .await?;
            total += 1;
        }
    }

    println!("Inserted {total} events");
    println!("Done. Login: demo@sproutling.app / {demo_password}");
    Ok(())
}

async fn create_child(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    birth_date: NaiveDate,
    gender: &str,
) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO children (owner_id, name, birth_date, gender)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(owner_id)
    .bind(name)
    .bind(birth_date)
    .bind(gender)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// One day of routine events. Infants feed more often and nap longer.
async fn seed_day(pool: &PgPool, child_id: Uuid, date: NaiveDate, infant: bool) -> Result<usize> {
    let mut rng = rand::thread_rng();
    let mut count = 0usize;

    let feedings: &[(u32, u32)] = if infant {
        &[(6, 30), (9, 45), (13, 0), (16, 30), (19, 45)]
    } else {
        &[(7, 30), (12, 0), (18, 0)]
    };
    for &(h, m) in feedings {
        let feeding_type = if infant {
            ["bottle", "breast", "formula"][rng.gen_range(0..3)]
        } else {
            "solid"
        };
        let amount = rng.gen_range(90..180) as f64;
        insert_event(
            pool,
            child_id,
            "feeding",
            at(date, h, m),
            Some(amount),
            Some("ml"),
            json!({ "feeding_type": feeding_type, "amount_ml": amount }),
        )
        .await?;
        count += 1;
    }

    let naps: &[(u32, u32)] = if infant {
        &[(10, 30), (14, 0)]
    } else {
        &[(13, 30)]
    };
    for &(h, m) in naps {
        insert_event(
            pool,
            child_id,
            "sleeping",
            at(date, h, m),
            Some(rng.gen_range(45..120) as f64),
            Some("min"),
            json!({ "location": "crib" }),
        )
        .await?;
        count += 1;
    }

    for &(h, m) in &[(8u32, 0u32), (11, 30), (15, 15), (19, 0)] {
        let diaper_type = ["wet", "dirty", "mixed"][rng.gen_range(0..3)];
        insert_event(
            pool,
            child_id,
            "diaper",
            at(date, h, m),
            None,
            None,
            json!({ "diaper_type": diaper_type }),
        )
        .await?;
        count += 1;
    }

    // A temperature check roughly every third day
    if rng.gen_ratio(1, 3) {
        insert_event(
            pool,
            child_id,
            "temperature",
            at(date, 18, 30),
            Some(36.2 + rng.gen_range(0..15) as f64 / 10.0),
            Some("°C"),
            json!({ "method": "ear" }),
        )
        .await?;
        count += 1;

        insert_event(
            pool,
            child_id,
            "medication",
            at(date, 19, 0),
            None,
            None,
            json!({ "medication_name": "paracetamol", "dosage": "2.5 ml", "reason": "teething" }),
        )
        .await?;
        count += 1;
    }

    Ok(count)
}

async fn insert_event(
    pool: &PgPool,
    child_id: Uuid,
    event_type: &str,
    occurred_at: chrono::DateTime<Utc>,
    value: Option<f64>,
    unit: Option<&str>,
    details: serde_json::Value,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO events (child_id, event_type, occurred_at, value, unit, details)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(child_id)
    .bind(event_type)
    .bind(occurred_at)
    .bind(value)
    .bind(unit)
    .bind(details)
    .execute(pool)
    .await?;
    Ok(())
}

fn at(date: NaiveDate, hour: u32, min: u32) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, min, 0).unwrap())
}
