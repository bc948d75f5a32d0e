//! Domain models persisted by the stockroom repositories.
//!
//! # Responsibility
//! - Define canonical data structures used by the persistence layer.
//! - Own field-level validation applied before any SQL write.
//!
//! # Invariants
//! - Identifiers are database-assigned: `None` before the first save,
//!   `Some` afterward.
//! - Database-assigned timestamps are never written by the application.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod person;
pub mod product;

/// Field-level validation error shared by all domain models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyProductName,
    EmptyProducer,
    NegativePrice,
    EmptyFirstName,
    EmptyLastName,
    EmptyNoteBody,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProductName => write!(f, "product name cannot be empty"),
            Self::EmptyProducer => write!(f, "product producer cannot be empty"),
            Self::NegativePrice => write!(f, "product price cannot be negative"),
            Self::EmptyFirstName => write!(f, "person first name cannot be empty"),
            Self::EmptyLastName => write!(f, "person last name cannot be empty"),
            Self::EmptyNoteBody => write!(f, "note body cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
