use prodcat_core::db::migrations::latest_version;
use prodcat_core::db::open_db_in_memory;
use prodcat_core::{Product, ProductRepository, RepoError, SqliteProductRepository};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn create_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product = Product::new("Product A", 123.0).unwrap();
    let id = repo.create(&product).unwrap();
    assert_eq!(id, product.id());

    let loaded = repo.find(id).unwrap();
    assert_eq!(loaded.id(), product.id());
    assert_eq!(loaded.name(), "Product A");
    assert_eq!(loaded.price(), 123.0);
}

#[test]
fn create_with_duplicate_id_fails_with_db_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product = Product::new("Product A", 123.0).unwrap();
    repo.create(&product).unwrap();

    let err = repo.create(&product).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)), "unexpected error: {err}");
}

#[test]
fn update_existing_product() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product = Product::new("Product A", 123.0).unwrap();
    repo.create(&product).unwrap();

    product.change_name("Product B").unwrap();
    product.change_price(456.0).unwrap();
    repo.update(&product).unwrap();

    let loaded = repo.find(product.id()).unwrap();
    assert_eq!(loaded.name(), "Product B");
    assert_eq!(loaded.price(), 456.0);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product = Product::new("Product A", 123.0).unwrap();
    let err = repo.update(&product).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == product.id()));
}

#[test]
fn find_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = repo.find(missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn find_all_preserves_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product_a = Product::new("Product A", 123.0).unwrap();
    let product_b = Product::new("Product B", 456.0).unwrap();
    let product_c = Product::new("Product C", 789.0).unwrap();
    repo.create(&product_a).unwrap();
    repo.create(&product_b).unwrap();
    repo.create(&product_c).unwrap();

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id(), product_a.id());
    assert_eq!(all[1].id(), product_b.id());
    assert_eq!(all[2].id(), product_c.id());
}

#[test]
fn find_all_on_empty_table_returns_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    assert!(repo.find_all().unwrap().is_empty());
}

#[test]
fn update_keeps_list_position() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product_a = Product::new("Product A", 123.0).unwrap();
    let product_b = Product::new("Product B", 456.0).unwrap();
    repo.create(&product_a).unwrap();
    repo.create(&product_b).unwrap();

    product_a.change_name("Product C").unwrap();
    product_a.change_price(789.0).unwrap();
    repo.update(&product_a).unwrap();

    let all = repo.find_all().unwrap();
    assert_eq!(all[0].id(), product_a.id());
    assert_eq!(all[0].name(), "Product C");
    assert_eq!(all[1].id(), product_b.id());
    assert_eq!(all[1].name(), "Product B");
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_products_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("products"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE products (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            created_at INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "products",
            column: "updated_at"
        })
    ));
}

#[test]
fn find_rejects_invalid_persisted_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO products (id, name, price) VALUES (?1, '', 123.0);",
        [id.to_string()],
    )
    .unwrap();

    let err = repo.find(id).unwrap_err();
    assert!(
        matches!(err, RepoError::Validation(_)),
        "unexpected error: {err}"
    );
}
