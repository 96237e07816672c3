//! Product use-case service.
//!
//! # Responsibility
//! - Provide stable create/find/update/list entry points for core callers.
//! - Map between plain request/response records and the domain entity.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Errors from entity validation and from the repository bubble up
//!   unchanged; nothing is caught or retried here.

use crate::model::product::{Product, ProductId};
use crate::repo::product_repo::{ProductRepository, RepoResult};
use serde::Serialize;

/// Use-case service wrapper for product CRUD operations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

/// Request model for creating a catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
}

/// Request model for looking up one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindProductRequest {
    pub id: ProductId,
}

/// Request model for overwriting a product's name and price.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductRequest {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

/// Plain output record handed to external callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOutput {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

impl From<&Product> for ProductOutput {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            price: product.price(),
        }
    }
}

/// Response envelope for the list use case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListOutput {
    /// Products in insertion order.
    pub products: Vec<ProductOutput>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new product from plain inputs and persists it.
    ///
    /// # Contract
    /// - Identity is generated by the entity factory, never by the caller.
    /// - Returns the stored record including the generated id.
    pub fn create_product(&self, request: &CreateProductRequest) -> RepoResult<ProductOutput> {
        let product = Product::new(request.name.clone(), request.price)?;
        self.repo.create(&product)?;
        Ok(ProductOutput::from(&product))
    }

    /// Looks up one product by id.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn find_product(&self, request: &FindProductRequest) -> RepoResult<ProductOutput> {
        let product = self.repo.find(request.id)?;
        Ok(ProductOutput::from(&product))
    }

    /// Overwrites an existing product's name and price.
    ///
    /// # Contract
    /// - The entity is rebuilt from the request, so invalid name/price
    ///   fail before any storage round-trip.
    /// - A missing id fails with the repository's not-found error.
    /// - Returns the applied record.
    pub fn update_product(&self, request: &UpdateProductRequest) -> RepoResult<ProductOutput> {
        let product = Product::with_id(request.id, request.name.clone(), request.price)?;
        self.repo.update(&product)?;
        Ok(ProductOutput::from(&product))
    }

    /// Lists every product in insertion order.
    pub fn list_products(&self) -> RepoResult<ProductListOutput> {
        let products = self
            .repo
            .find_all()?
            .iter()
            .map(ProductOutput::from)
            .collect();
        Ok(ProductListOutput { products })
    }
}
