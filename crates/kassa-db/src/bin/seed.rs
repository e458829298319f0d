//! # Seed Data Generator
//!
//! Populates the database with a festival's bars and menus for development.
//!
//! ## Usage
//! ```bash
//! # Default database path and event id
//! cargo run -p kassa-db --bin seed
//!
//! # Custom database path and event
//! cargo run -p kassa-db --bin seed -- --db ./data/kassa.db --event seefest-2026
//! ```

use chrono::Utc;
use std::env;
use tracing::info;
use uuid::Uuid;

use kassa_core::{Bar, Product};
use kassa_db::{Database, DbConfig};

/// Bars and their menus. Prices are gross cents (tax-inclusive).
const BARS: &[(&str, &[(&str, i64)])] = &[
    (
        "Beer Garden",
        &[
            ("Beer 0.5l", 250),
            ("Beer 0.3l", 200),
            ("Radler 0.5l", 250),
            ("Alcohol-free Beer 0.5l", 230),
            ("Shandy 0.3l", 210),
        ],
    ),
    (
        "Wine Stand",
        &[
            ("White Wine 0.25l", 350),
            ("Red Wine 0.25l", 350),
            ("Wine Spritzer 0.25l", 280),
            ("Prosecco 0.1l", 320),
        ],
    ),
    (
        "Food Stall",
        &[
            ("Bratwurst", 300),
            ("Cheese Sausage", 320),
            ("Pretzel", 200),
            ("Fries", 280),
            ("Langos", 450),
        ],
    ),
    (
        "Soft Drinks",
        &[
            ("Cola 0.5l", 250),
            ("Apple Spritzer 0.5l", 240),
            ("Water 0.5l", 180),
            ("Coffee", 220),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut db_path = "./kassa.db".to_string();
    let mut event_id = "seefest-2026".to_string();

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            "--event" if i + 1 < args.len() => {
                event_id = args[i + 1].clone();
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: seed [--db PATH] [--event EVENT_ID]");
                std::process::exit(1);
            }
        }
    }

    info!(db = %db_path, event = %event_id, "Seeding festival data");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let mut bar_count = 0usize;
    let mut product_count = 0usize;

    for (bar_name, menu) in BARS {
        let now = Utc::now();
        let bar = Bar {
            id: Uuid::new_v4().to_string(),
            event_id: event_id.clone(),
            name: bar_name.to_string(),
            is_active: true,
            created_at: now,
        };
        db.bars().insert(&bar).await?;
        bar_count += 1;

        for (sort_order, (product_name, price_cents)) in menu.iter().enumerate() {
            let product = Product {
                id: Uuid::new_v4().to_string(),
                bar_id: bar.id.clone(),
                name: product_name.to_string(),
                price_cents: *price_cents,
                sort_order: sort_order as i64,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            db.products().insert(&product).await?;
            product_count += 1;
        }

        info!(bar = %bar_name, products = menu.len(), "Seeded bar");
    }

    info!(bars = bar_count, products = product_count, "Seed complete");

    db.close().await;
    Ok(())
}
