//! Product use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence
//!   contracts.

use crate::model::product::{Product, ProductId};
use crate::repo::product_repo::ProductRepository;
use crate::repo::StoreResult;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Use-case service wrapper for product CRUD operations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds and persists a product in one step.
    ///
    /// # Contract
    /// - Returns the saved product with its generated id assigned.
    pub fn create(
        &self,
        name: impl Into<String>,
        producer: impl Into<String>,
        price: Decimal,
        expiration_date: NaiveDate,
    ) -> StoreResult<Product> {
        let mut product = Product::new(name, producer, price, expiration_date);
        self.repo.save(&mut product)?;
        Ok(product)
    }

    /// Persists a transient product and assigns its generated id.
    pub fn save(&self, product: &mut Product) -> StoreResult<ProductId> {
        self.repo.save(product)
    }

    /// Returns every stored product in storage-defined order.
    pub fn find_all(&self) -> StoreResult<Vec<Product>> {
        self.repo.find_all()
    }

    /// Returns the single product with the given id.
    pub fn find_one(&self, id: ProductId) -> StoreResult<Product> {
        self.repo.find_one(id)
    }

    /// Updates an existing product by its id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update(&self, product: &Product) -> StoreResult<()> {
        self.repo.update(product)
    }

    /// Removes an existing product by its id.
    pub fn remove(&self, product: &Product) -> StoreResult<()> {
        self.repo.remove(product)
    }
}
