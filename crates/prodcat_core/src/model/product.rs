//! Product domain entity.
//!
//! # Responsibility
//! - Define the catalog's canonical product record and its factory
//!   constructors.
//! - Validate name/price invariants on construction and on every mutation.
//!
//! # Invariants
//! - `id` is stable and never reused for another product.
//! - `name` is never empty (whitespace-only counts as empty).
//! - `price` is always a finite value `>= 0`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every product in the catalog.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProductId = Uuid;

/// Validation failure for product construction or mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    /// The nil UUID is reserved and never a valid product identity.
    NilId,
    /// Product name was empty or whitespace-only.
    EmptyName,
    /// Product price was below zero.
    NegativePrice { price: f64 },
    /// Product price was NaN or infinite.
    NonFinitePrice,
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "product id must not be the nil uuid"),
            Self::EmptyName => write!(f, "product name must not be empty"),
            Self::NegativePrice { price } => {
                write!(f, "product price must be >= 0, got {price}")
            }
            Self::NonFinitePrice => write!(f, "product price must be a finite number"),
        }
    }
}

impl Error for ProductValidationError {}

/// Canonical catalog entity holding identity, name and price.
///
/// Fields are private so the validation invariants cannot be bypassed;
/// all reads go through accessors and all writes through the validating
/// mutation methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
}

/// Raw wire shape used to re-validate products on deserialization.
#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: f64,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ProductValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Product::with_id(record.id, record.name, record.price)
    }
}

impl Product {
    /// Creates a new product with a generated stable ID.
    ///
    /// This is the factory entry point for brand-new catalog entries.
    ///
    /// # Errors
    /// - `ProductValidationError` when `name` or `price` is invalid.
    pub fn new(name: impl Into<String>, price: f64) -> Result<Self, ProductValidationError> {
        Self::with_id(Uuid::new_v4(), name, price)
    }

    /// Creates a product with a caller-provided stable ID.
    ///
    /// Used when identity already exists externally, e.g. when rebuilding
    /// an entity from a stored row or from an update request.
    ///
    /// # Errors
    /// - `ProductValidationError` when `id`, `name` or `price` is invalid.
    pub fn with_id(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
    ) -> Result<Self, ProductValidationError> {
        if id.is_nil() {
            return Err(ProductValidationError::NilId);
        }
        let name = name.into();
        validate_name(&name)?;
        validate_price(price)?;
        Ok(Self { id, name, price })
    }

    /// Returns the stable product identity.
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Returns the current product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current product price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Renames the product in place.
    ///
    /// # Errors
    /// - `ProductValidationError::EmptyName` when `new_name` is empty;
    ///   the product keeps its previous name in that case.
    pub fn change_name(&mut self, new_name: impl Into<String>) -> Result<(), ProductValidationError> {
        let new_name = new_name.into();
        validate_name(&new_name)?;
        self.name = new_name;
        Ok(())
    }

    /// Reprices the product in place.
    ///
    /// # Errors
    /// - `ProductValidationError` when `new_price` is negative or not
    ///   finite; the product keeps its previous price in that case.
    pub fn change_price(&mut self, new_price: f64) -> Result<(), ProductValidationError> {
        validate_price(new_price)?;
        self.price = new_price;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::EmptyName);
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ProductValidationError> {
    if !price.is_finite() {
        return Err(ProductValidationError::NonFinitePrice);
    }
    if price < 0.0 {
        return Err(ProductValidationError::NegativePrice { price });
    }
    Ok(())
}
