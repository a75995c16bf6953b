//! # Seed Data Loader
//!
//! Populates the database with the sample restaurant menu.
//!
//! ## Usage
//! ```bash
//! # Seed ./tabletop.db
//! cargo run -p tabletop-db --bin seed
//!
//! # Specify database path
//! cargo run -p tabletop-db --bin seed -- --db ./data/tabletop.db
//!
//! # Replace an existing menu (soft-deletes current items first)
//! cargo run -p tabletop-db --bin seed -- --reset
//! ```

use std::env;
use tabletop_core::{Money, NewMenuItem, ValidationError};
use tabletop_db::{Database, DbConfig, MenuItemRepository};

/// (name, price, category)
const MENU: &[(&str, i64, &str)] = &[
    ("Butter Chicken", 350, "Main Course"),
    ("Paneer Tikka", 280, "Starters"),
    ("Dal Makhani", 220, "Main Course"),
    ("Naan", 40, "Bread"),
    ("Jeera Rice", 150, "Rice"),
    ("Cold Drink", 45, "Beverages"),
    ("Gulab Jamun", 80, "Dessert"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tabletop.db");
    let mut reset = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--reset" | "-r" => reset = true,
            "--help" | "-h" => {
                println!("Tabletop POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tabletop.db)");
                println!("  -r, --reset        Soft-delete the current menu before seeding");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tabletop POS Seed Data Loader");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let menu = db.menu_items();

    if reset {
        let existing = menu.list(None).await?;
        for item in &existing {
            menu.soft_delete(&item.id).await?;
        }
        println!("✓ Soft-deleted {} existing items", existing.len());
    } else {
        let existing = menu.count().await?;
        if existing > 0 {
            println!("⚠ Database already has {} menu items", existing);
            println!("  Skipping seed to avoid duplicates.");
            println!("  Re-run with --reset to replace the menu.");
            return Ok(());
        }
    }

    let (seeded, failed) = seed_menu(&menu, MENU).await?;

    println!();
    println!("✓ Seeded {} of {} menu items", seeded, MENU.len());
    for category in menu.categories().await? {
        let items = menu.list(Some(&category)).await?;
        println!("  {}: {} items", category, items.len());
    }

    db.close().await;

    if failed > 0 {
        return Err(format!("{} menu items failed to insert", failed).into());
    }

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

/// Inserts each item, returning `(inserted, failed)`.
///
/// A failed insert is reported and skipped. An item that fails validation
/// aborts the seed before anything else is written.
async fn seed_menu(
    menu: &MenuItemRepository,
    items: &[(&str, i64, &str)],
) -> Result<(usize, usize), ValidationError> {
    let items = items
        .iter()
        .map(|(name, price, category)| {
            NewMenuItem {
                name: name.to_string(),
                price: Money::from_minor(*price),
                category: category.to_string(),
                is_available: true,
            }
            .validated()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seeded = 0;
    let mut failed = 0;
    for item in &items {
        match menu.create(item).await {
            Ok(_) => seeded += 1,
            Err(e) => {
                eprintln!("✗ Failed to insert {}: {}", item.name, e);
                failed += 1;
            }
        }
    }
    Ok((seeded, failed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_full_menu() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let menu = db.menu_items();

        assert_eq!(seed_menu(&menu, MENU).await.unwrap(), (MENU.len(), 0));
        assert_eq!(menu.count().await.unwrap(), MENU.len() as i64);
    }

    #[tokio::test]
    async fn test_failed_inserts_not_counted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_naan BEFORE INSERT ON menu_items \
             WHEN NEW.name = 'Naan' BEGIN SELECT RAISE(ABORT, 'no naan'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();
        let menu = db.menu_items();

        assert_eq!(seed_menu(&menu, MENU).await.unwrap(), (MENU.len() - 1, 1));
        assert_eq!(menu.count().await.unwrap(), MENU.len() as i64 - 1);
    }

    #[tokio::test]
    async fn test_invalid_item_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let menu = db.menu_items();

        let items = [("Naan", 40, "Bread"), ("", 10, "Bread")];
        assert!(seed_menu(&menu, &items).await.is_err());
        assert_eq!(menu.count().await.unwrap(), 0);
    }
}
