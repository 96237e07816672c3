//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage-agnostic product persistence contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod product_repo;
