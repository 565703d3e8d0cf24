//! supplier-domain
//!
//! Pure domain models for supplier (調達先) master records.
//! No I/O, no CLI, no gateway. Only data types, field rules and fixtures.

pub mod common;
pub mod error;
pub mod fixtures;
pub mod supplier;

pub use common::*;
pub use error::DomainError;
pub use supplier::*;
