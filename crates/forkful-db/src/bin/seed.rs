//! # Catalog Seeder
//!
//! Fills a Forkful database with the sample restaurants and menus.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p forkful-db --bin seed
//!
//! # Specify database path
//! cargo run -p forkful-db --bin seed -- --db ./data/forkful.db
//! ```
//!
//! Seeding is skipped when the catalog already has restaurants; delete the
//! database file to start over.

use std::env;

use forkful_db::seed::{seed_catalog, SeedOutcome};
use forkful_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./forkful_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Forkful Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./forkful_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {other}");
            }
        }
        i += 1;
    }

    println!("🌱 Forkful Catalog Seeder");
    println!("=========================");
    println!("Database: {db_path}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    match seed_catalog(&db).await? {
        SeedOutcome::Skipped { existing } => {
            println!("⚠ Database already has {existing} restaurants");
            println!("  Skipping seed to avoid duplicates.");
            println!("  Delete the database file to regenerate.");
        }
        SeedOutcome::Seeded {
            restaurants,
            menu_items,
        } => {
            println!("✓ Created {restaurants} restaurants with {menu_items} menu items");
            println!();
            for restaurant in db.restaurants().list().await? {
                println!(
                    "  {:<22} {:<14} ★ {:.1}  min {}",
                    restaurant.name, restaurant.cuisine_type, restaurant.rating, restaurant.minimum_order
                );
            }
        }
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
