//! # Seed Data Generator
//!
//! Populates the database with a realistic tire-shop catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p tread-db --bin seed
//! cargo run -p tread-db --bin seed -- --db ./data/tread.db
//! ```
//!
//! Generates brands, the predefined size catalogs, and products across
//! all three types (tires per brand/pattern/size, a few alloy wheels,
//! and general counter goods).

use std::env;

use tread_core::{
    NewProduct, NewTireSize, NewWheelSize, ProductSpec, TireAttributes, WheelAttributes,
};
use tread_db::{Database, DbConfig};

/// Brands carried by the shop.
const BRANDS: &[&str] = &[
    "Bridgestone",
    "Michelin",
    "Yokohama",
    "Dunlop",
    "Apollo",
    "General",
    "Enkei",
    "BBS",
];

/// (width, aspect_ratio, diameter, load_index, speed_rating)
const TIRE_SIZES: &[(i64, i64, i64, &str, &str)] = &[
    (155, 70, 12, "73", "T"),
    (165, 65, 13, "77", "T"),
    (175, 70, 13, "82", "T"),
    (185, 65, 14, "86", "H"),
    (185, 65, 15, "88", "H"),
    (195, 65, 15, "91", "V"),
    (205, 55, 16, "91", "V"),
    (215, 55, 17, "94", "W"),
    (225, 45, 17, "91", "W"),
    (235, 55, 18, "100", "V"),
];

/// Tire patterns per brand, combined with the size table.
const TIRE_PATTERNS: &[&str] = &["Turanza", "Ecopia", "Alnac", "SP Touring", "BluEarth"];

/// (diameter, width, pcd, offset, stud_count, stud_type)
const WHEEL_SIZES: &[(f64, f64, &str, f64, i64, &str)] = &[
    (13.0, 5.5, "4x100", 38.0, 4, "Short Stud"),
    (14.0, 6.0, "4x100", 38.0, 4, "Short Stud"),
    (15.0, 6.5, "4x114.3", 40.0, 4, "Long Stud"),
    (16.0, 7.0, "4x100", 38.0, 5, "Long Stud"),
    (17.0, 7.5, "5x114.3", 42.0, 5, "Long Stud"),
];

/// (name, price_cents, stock)
const GENERAL_GOODS: &[(&str, i64, i64)] = &[
    ("Tubeless valve stem", 15_000, 200),
    ("Balance weights 10g strip", 8_000, 500),
    ("Wheel alignment service", 250_000, 9999),
    ("Nitrogen refill", 20_000, 9999),
    ("Puncture repair kit", 45_000, 60),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut db_path = String::from("./tread_dev.db");

    let args: Vec<String> = env::args().collect();
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
                println!("Tread POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tread_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tread POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {} products, skipping seed.", existing);
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    // Brands
    for &brand in BRANDS {
        db.catalog().create_brand(brand).await?;
    }
    println!("Seeded {} brands", BRANDS.len());

    // Size catalogs
    for (width, aspect_ratio, diameter, li, sr) in TIRE_SIZES {
        db.catalog()
            .create_tire_size(&NewTireSize {
                width: *width,
                aspect_ratio: *aspect_ratio,
                diameter: *diameter,
                load_index: Some((*li).to_string()),
                speed_rating: Some((*sr).to_string()),
                size_display: None,
            })
            .await?;
    }
    for (diameter, width, pcd, offset, stud_count, stud_type) in WHEEL_SIZES {
        db.catalog()
            .create_wheel_size(&NewWheelSize {
                diameter: *diameter,
                width: *width,
                pcd: Some((*pcd).to_string()),
                offset: Some(*offset),
                center_bore: None,
                stud_count: Some(*stud_count),
                stud_type: Some((*stud_type).to_string()),
                size_display: None,
            })
            .await?;
    }
    println!(
        "Seeded {} tire sizes, {} wheel sizes",
        TIRE_SIZES.len(),
        WHEEL_SIZES.len()
    );

    // Tire products: one pattern per brand/size pairing
    let mut generated = 0usize;
    for (brand_idx, brand) in BRANDS.iter().take(6).enumerate() {
        for (size_idx, (width, aspect_ratio, diameter, li, sr)) in TIRE_SIZES.iter().enumerate() {
            let seed = brand_idx * TIRE_SIZES.len() + size_idx;
            let pattern = TIRE_PATTERNS[seed % TIRE_PATTERNS.len()];

            // Deterministic spread so repeated seeding is comparable
            let price_cents = 350_000 + (seed as i64 * 17 % 40) * 10_000;
            let stock = (seed as i64 * 7) % 24;

            db.products()
                .create(&NewProduct {
                    sku: Some(format!("TYR-{:03}", seed)),
                    name: format!("{} {} {}/{}R{}", brand, pattern, width, aspect_ratio, diameter),
                    price_cents,
                    cost_price_cents: price_cents * 80 / 100,
                    stock_quantity: stock,
                    low_stock_threshold: Some(4),
                    spec: ProductSpec::Tire(TireAttributes {
                        width: *width,
                        aspect_ratio: *aspect_ratio,
                        diameter: *diameter,
                        load_index: Some((*li).to_string()),
                        speed_rating: Some((*sr).to_string()),
                    }),
                })
                .await?;
            generated += 1;
        }
    }

    // Alloy wheel products
    for (idx, (diameter, width, pcd, offset, stud_count, stud_type)) in
        WHEEL_SIZES.iter().enumerate()
    {
        db.products()
            .create(&NewProduct {
                sku: Some(format!("ALW-{:03}", idx)),
                name: format!("Enkei Alloy {}x{}", diameter, width),
                price_cents: 900_000 + idx as i64 * 150_000,
                cost_price_cents: 700_000,
                stock_quantity: 8,
                low_stock_threshold: Some(4),
                spec: ProductSpec::AlloyWheel(WheelAttributes {
                    diameter: *diameter,
                    width: *width,
                    pcd: Some((*pcd).to_string()),
                    offset: Some(*offset),
                    center_bore: None,
                    stud_count: Some(*stud_count),
                    stud_type: Some((*stud_type).to_string()),
                }),
            })
            .await?;
        generated += 1;
    }

    // General counter goods
    for (name, price_cents, stock) in GENERAL_GOODS {
        db.products()
            .create(&NewProduct {
                sku: None,
                name: (*name).to_string(),
                price_cents: *price_cents,
                cost_price_cents: 0,
                stock_quantity: *stock,
                low_stock_threshold: None,
                spec: ProductSpec::General,
            })
            .await?;
        generated += 1;
    }

    println!("Seeded {} products", generated);

    let hits = db.products().get_by_size("205/55R16").await?;
    println!("Size search '205/55R16': {} products", hits.len());

    println!();
    println!("Seed complete");

    Ok(())
}
