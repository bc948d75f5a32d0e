//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the save -> update -> fetch flow against an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::error::Error;
use stockroom_core::{new_pool_in_memory, ProductService, SqliteProductRepository};

fn main() {
    if let Err(err) = run() {
        eprintln!("stockroom demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let pool = new_pool_in_memory()?;
    let repo = SqliteProductRepository::try_new(pool)?;
    let service = ProductService::new(repo);

    let expiration = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid expiration date")?;
    let mut product = service.create("Milk", "Acme", Decimal::new(150, 2), expiration)?;
    println!(
        "saved product id={} name={}",
        product.id.unwrap_or_default(),
        product.name
    );

    product.name = "Whole Milk".to_string();
    product.price = Decimal::new(199, 2);
    service.update(&product)?;

    let fetched = service.find_one(product.id.ok_or("missing product id")?)?;
    println!(
        "fetched product id={} name={} producer={} price={} expires={}",
        fetched.id.unwrap_or_default(),
        fetched.name,
        fetched.producer,
        fetched.price,
        fetched.expiration_date
    );
    println!("stockroom_core version={}", stockroom_core::core_version());

    Ok(())
}
