//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `products` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `find_all` returns rows in insertion order.
//! - Write paths never persist a state the entity type would reject.

use crate::db::DbError;
use crate::db::migrations::latest_version;
use crate::model::product::{Product, ProductId, ProductValidationError};
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PRODUCT_SELECT_SQL: &str = "SELECT id, name, price FROM products";

const REQUIRED_COLUMNS: &[&str] = &["id", "name", "price", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProductValidationError),
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection has schema version {actual_version}, expected {expected_version}; open it through db::open_db first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProductValidationError> for RepoError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for product CRUD operations.
///
/// Storage backends implement this so services stay persistence-agnostic.
pub trait ProductRepository {
    /// Persists a new product row. Duplicate ids fail with a DB error.
    fn create(&self, product: &Product) -> RepoResult<ProductId>;
    /// Overwrites the stored row matching the product's id.
    fn update(&self, product: &Product) -> RepoResult<()>;
    /// Loads one product by id.
    fn find(&self, id: ProductId) -> RepoResult<Product>;
    /// Loads every product in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps a connection after verifying it carries the expected schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations never ran on it.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this repository was built against.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_products_schema(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create(&self, product: &Product) -> RepoResult<ProductId> {
        self.conn.execute(
            "INSERT INTO products (id, name, price) VALUES (?1, ?2, ?3);",
            params![product.id().to_string(), product.name(), product.price()],
        )?;

        Ok(product.id())
    }

    fn update(&self, product: &Product) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                price = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![product.name(), product.price(), product.id().to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(product.id()));
        }

        Ok(())
    }

    fn find(&self, id: ProductId) -> RepoResult<Product> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => parse_product_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Product>> {
        // rowid is monotonic for this table (no deletes in the schema), so
        // ordering by it preserves insertion order.
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY rowid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }
}

fn ensure_products_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'products'
         );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('products');")?;
    let mut present: HashSet<String> = HashSet::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        present.insert(row.get(0)?);
    }

    for &column in REQUIRED_COLUMNS {
        if !present.contains(column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "products",
                column,
            });
        }
    }

    Ok(())
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in products.id"))
    })?;

    let name: String = row.get("name")?;
    let price: f64 = row.get("price")?;

    // Rebuild through the validating constructor so drifted rows fail here.
    let product = Product::with_id(id, name, price)?;
    Ok(product)
}
