//! Core domain logic for the product catalog.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::product::{Product, ProductId, ProductValidationError};
pub use repo::product_repo::{
    ProductRepository, RepoError, RepoResult, SqliteProductRepository,
};
pub use service::product_service::{
    CreateProductRequest, FindProductRequest, ProductListOutput, ProductOutput, ProductService,
    UpdateProductRequest,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
