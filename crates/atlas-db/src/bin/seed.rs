//! # Seed Data Generator
//!
//! Populates the database with a demo company and catalog for development.
//!
//! ## Usage
//! ```bash
//! # Default: 200 products into ./atlas_dev.db
//! cargo run -p atlas-db --bin seed
//!
//! # Custom amount / path
//! cargo run -p atlas-db --bin seed -- --count 500 --db ./data/atlas.db
//! ```
//!
//! Each product gets a deterministic code, a price between 0.99 and 19.99,
//! and a stock level between 0 and 100. The generated company id is printed
//! so it can be used as the tenant in manual testing.

use chrono::Utc;
use std::env;
use tracing::info;
use uuid::Uuid;

use atlas_core::{Company, Product, Unit};
use atlas_db::{Database, DbConfig};

/// Product names by category, grocery-flavored.
const CATALOG: &[(&str, Unit, &[&str])] = &[
    (
        "GRN",
        Unit::Kilogram,
        &[
            "Basmati Rice",
            "Brown Rice",
            "Whole Wheat Flour",
            "Chickpea Flour",
            "Red Lentils",
            "Green Lentils",
            "Chickpeas",
            "Kidney Beans",
            "Sugar",
            "Rock Salt",
        ],
    ),
    (
        "LIQ",
        Unit::Litre,
        &[
            "Sunflower Oil",
            "Olive Oil",
            "Mustard Oil",
            "Whole Milk",
            "Skim Milk",
            "Apple Juice",
            "Orange Juice",
            "Mango Pulp",
            "Vinegar",
            "Rose Water",
        ],
    ),
    (
        "PCS",
        Unit::Piece,
        &[
            "Eggs Dozen",
            "White Bread",
            "Wheat Bread",
            "Butter Block",
            "Cheddar Cheese",
            "Green Tea Box",
            "Black Tea Box",
            "Honey Jar",
            "Peanut Butter Jar",
            "Tomato Ketchup",
        ],
    ),
    (
        "SPC",
        Unit::Gram,
        &[
            "Turmeric Powder",
            "Red Chilli Powder",
            "Coriander Powder",
            "Cumin Seeds",
            "Black Pepper",
            "Cardamom",
            "Cinnamon",
            "Cloves",
            "Garam Masala",
            "Dried Fenugreek",
        ],
    ),
];

/// Pack-size variants with a price addon in cents.
const SIZES: &[(&str, i64)] = &[
    ("250g", 0),
    ("500g", 50),
    ("1kg", 120),
    ("2kg", 260),
    ("5kg", 600),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./atlas_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Atlas Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./atlas_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, count, "seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        info!(existing, "database already has products, skipping seed");
        return Ok(());
    }

    let now = Utc::now();
    let company = Company {
        id: Uuid::new_v4().to_string(),
        name: "Atlas Demo Traders".to_string(),
        created_at: now,
        updated_at: now,
    };
    db.companies().insert(&company).await?;
    info!(company_id = %company.id, "created demo company");

    let mut generated = 0usize;
    'outer: for (category_idx, (code_prefix, unit, names)) in CATALOG.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size, price_addon) in SIZES.iter() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + name_idx * 20 + generated;
                let product = generate_product(&company.id, code_prefix, *unit, name, size, *price_addon, seed);
                atlas_core::validation::validate_product(&product)?;
                db.products().insert(&product).await?;
                generated += 1;
            }
        }
    }

    info!(generated, "seed complete");
    println!("Seeded {} products for company {}", generated, company.id);

    db.close().await;

    Ok(())
}

/// Generates a single product with deterministic pseudo-variety.
fn generate_product(
    company_id: &str,
    code_prefix: &str,
    unit: Unit,
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> Product {
    let now = Utc::now();

    let base_price = 99 + ((seed * 17) % 1800) as i64; // 0.99 - 18.99
    let price_cents = base_price + price_addon;
    let buying_pct = 60 + (seed % 20) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        company_id: company_id.to_string(),
        category_id: None,
        name: format!("{name} {size}"),
        code: Some(format!("{}-{:04}", code_prefix, seed)),
        description: None,
        unit: Some(unit),
        selling_price_cents: price_cents,
        buying_price_cents: Some(price_cents * buying_pct / 100),
        quantity: (seed % 101) as i64,
        created_at: now,
        updated_at: now,
    }
}
