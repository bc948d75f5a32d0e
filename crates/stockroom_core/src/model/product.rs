//! Product domain model.
//!
//! # Responsibility
//! - Define the in-memory shape mapped to and from `products` rows.
//! - Validate field constraints before SQL writes.
//!
//! # Invariants
//! - `id` is `None` until the first successful save assigns the
//!   database-generated identifier.
//! - `creation_time` is assigned by the database; it stays `None` in
//!   memory until the row is read back.

use crate::model::ValidationError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Database-generated product identifier.
pub type ProductId = i64;

/// One row of the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Generated primary key. `None` for values not yet saved.
    pub id: Option<ProductId>,
    pub name: String,
    pub producer: String,
    /// Exact decimal price, persisted as text to avoid float rounding.
    pub price: Decimal,
    pub expiration_date: NaiveDate,
    /// Set by the database on insert; read-only afterwards.
    pub creation_time: Option<NaiveDateTime>,
}

impl Product {
    /// Creates a transient product with no identifier yet.
    pub fn new(
        name: impl Into<String>,
        producer: impl Into<String>,
        price: Decimal,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            producer: producer.into(),
            price,
            expiration_date,
            creation_time: None,
        }
    }

    /// Returns whether this value is backed by a database row.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks field constraints enforced before any SQL write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyProductName);
        }
        if self.producer.trim().is_empty() {
            return Err(ValidationError::EmptyProducer);
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ValidationError::NegativePrice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Product;
    use crate::model::ValidationError;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample() -> Product {
        Product::new(
            "Milk",
            "Acme",
            Decimal::new(150, 2),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn new_product_is_transient() {
        let product = sample();
        assert!(!product.is_persisted());
        assert!(product.creation_time.is_none());
    }

    #[test]
    fn validate_accepts_well_formed_product() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_fields_and_negative_price() {
        let mut blank_name = sample();
        blank_name.name = "  ".to_string();
        assert_eq!(
            blank_name.validate(),
            Err(ValidationError::EmptyProductName)
        );

        let mut blank_producer = sample();
        blank_producer.producer = String::new();
        assert_eq!(
            blank_producer.validate(),
            Err(ValidationError::EmptyProducer)
        );

        let mut negative = sample();
        negative.price = Decimal::new(-1, 0);
        assert_eq!(negative.validate(), Err(ValidationError::NegativePrice));
    }

    #[test]
    fn serializes_price_and_date_as_text() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["price"], "1.50");
        assert_eq!(json["expiration_date"], "2024-01-01");
    }
}
