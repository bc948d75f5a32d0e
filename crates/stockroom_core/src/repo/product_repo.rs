//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate in-memory products to and from `products` rows.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Product::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - One pooled connection is borrowed per call and never held across
//!   calls.

use crate::db::DbPool;
use crate::model::product::{Product, ProductId};
use crate::repo::{ensure_required_table, ensure_schema_version, StoreError, StoreResult};
use rusqlite::{params, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    producer,
    price,
    expiration_date,
    creation_time
FROM products";

const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "producer",
    "price",
    "expiration_date",
    "creation_time",
];

/// Repository interface for product CRUD operations.
pub trait ProductRepository {
    /// Inserts a new row and assigns the generated id onto the product.
    fn save(&self, product: &mut Product) -> StoreResult<ProductId>;
    /// Returns every stored product in storage-defined order.
    fn find_all(&self) -> StoreResult<Vec<Product>>;
    /// Returns the single product with the given id.
    fn find_one(&self, id: ProductId) -> StoreResult<Product>;
    /// Overwrites name, producer, price and expiration date of the row
    /// matching the product id.
    fn update(&self, product: &Product) -> StoreResult<()>;
    /// Deletes the row matching the product id.
    fn remove(&self, product: &Product) -> StoreResult<()>;
}

/// SQLite-backed product repository over a shared connection pool.
#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: DbPool,
}

impl SqliteProductRepository {
    /// Constructs a repository after checking the pool points at a
    /// migrated database with the expected `products` schema.
    pub fn try_new(pool: DbPool) -> StoreResult<Self> {
        let conn = pool.get()?;
        ensure_schema_version(&conn)?;
        ensure_required_table(&conn, "products", PRODUCT_COLUMNS)?;
        drop(conn);
        Ok(Self { pool })
    }
}

impl ProductRepository for SqliteProductRepository {
    fn save(&self, product: &mut Product) -> StoreResult<ProductId> {
        product.validate()?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO products (name, producer, price, expiration_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                product.name.as_str(),
                product.producer.as_str(),
                product.price.to_string(),
                product.expiration_date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        if id <= 0 {
            return Err(StoreError::InvalidData(
                "insert did not yield a generated product id".to_string(),
            ));
        }

        product.id = Some(id);
        Ok(id)
    }

    fn find_all(&self) -> StoreResult<Vec<Product>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{PRODUCT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;

        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn find_one(&self, id: ProductId) -> StoreResult<Product> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;

        match rows.next()? {
            Some(row) => parse_product_row(row),
            None => Err(StoreError::NotFound {
                entity: "product",
                id,
            }),
        }
    }

    fn update(&self, product: &Product) -> StoreResult<()> {
        product.validate()?;
        let id = product.id.ok_or(StoreError::MissingId("product"))?;

        let conn = self.pool.get()?;
        let changed = conn.execute(
            "UPDATE products
             SET name = ?1, producer = ?2, price = ?3, expiration_date = ?4
             WHERE id = ?5;",
            params![
                product.name.as_str(),
                product.producer.as_str(),
                product.price.to_string(),
                product.expiration_date,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "product",
                id,
            });
        }

        Ok(())
    }

    fn remove(&self, product: &Product) -> StoreResult<()> {
        let id = product.id.ok_or(StoreError::MissingId("product"))?;

        let conn = self.pool.get()?;
        let changed = conn.execute("DELETE FROM products WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "product",
                id,
            });
        }

        Ok(())
    }
}

fn parse_product_row(row: &Row<'_>) -> StoreResult<Product> {
    let price_text: String = row.get("price")?;
    let price = Decimal::from_str(&price_text).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid price value `{price_text}` in products.price"
        ))
    })?;

    let product = Product {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        producer: row.get("producer")?,
        price,
        expiration_date: row.get("expiration_date")?,
        creation_time: Some(row.get("creation_time")?),
    };
    product.validate()?;
    Ok(product)
}
