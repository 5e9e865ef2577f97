//! # Item Repository
//!
//! Database operations for grocery items.
//!
//! ## Key Operations
//! - Insert one item (the store assigns the id)
//! - List every item in insertion order
//!
//! Items are append-only: there is no update or delete.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewGroceryItem ──bind──► items row ──FromRow──► ItemRow ──► GroceryItem │
//! │                                                                         │
//! │  pkg_unit / inv_unit  enum label   ◄──► TEXT                           │
//! │  date                 NaiveDate    ◄──► TEXT  (YYYY-MM-DD)             │
//! │  sku / upc            Sku / Upc    ◄──► INTEGER ('' or NULL = none)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use grocer_core::{GroceryItem, InventoryUnit, NewGroceryItem, PackageUnit, Sku, Upc};

// `sku`/`upc` are read as text: rows written by older versions stored
// blank codes as '' and numbers as digit strings.
const SELECT_ITEMS: &str = r#"
    SELECT
        id, name, pkg_unit, pkg_qty, inv_unit, inv_qty, price, store, date,
        CAST(sku AS TEXT) AS sku,
        CAST(upc AS TEXT) AS upc
    FROM items
    ORDER BY id
"#;

/// Raw `items` row before conversion into domain types.
///
/// Every column is optional here; a NULL in a required column becomes
/// [`DbError::CorruptRow`] during conversion.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    name: Option<String>,
    pkg_unit: Option<String>,
    pkg_qty: Option<f64>,
    inv_unit: Option<String>,
    inv_qty: Option<f64>,
    price: Option<f64>,
    store: Option<String>,
    date: Option<String>,
    sku: Option<String>,
    upc: Option<String>,
}

fn required<T>(id: i64, column: &str, value: Option<T>) -> DbResult<T> {
    value.ok_or_else(|| DbError::corrupt_row(id, format!("{column} is NULL")))
}

/// Integer value of a stored code. Blank means no code.
fn stored_code(id: i64, column: &str, value: Option<String>) -> DbResult<Option<i64>> {
    let Some(text) = value else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    text.parse::<i64>()
        .map(Some)
        .map_err(|_| DbError::corrupt_row(id, format!("{column} is not a number: {text:?}")))
}

impl TryFrom<ItemRow> for GroceryItem {
    type Error = DbError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let pkg_unit = required(id, "pkg_unit", row.pkg_unit)?
            .parse::<PackageUnit>()
            .map_err(|e| DbError::corrupt_row(id, e))?;
        let inv_unit = required(id, "inv_unit", row.inv_unit)?
            .parse::<InventoryUnit>()
            .map_err(|e| DbError::corrupt_row(id, e))?;
        let date = NaiveDate::parse_from_str(&required(id, "date", row.date)?, "%Y-%m-%d")
            .map_err(|e| DbError::corrupt_row(id, e))?;
        let sku = stored_code(id, "sku", row.sku)?
            .map(Sku::from_stored)
            .transpose()
            .map_err(|e| DbError::corrupt_row(id, e))?;
        let upc = stored_code(id, "upc", row.upc)?
            .map(Upc::from_stored)
            .transpose()
            .map_err(|e| DbError::corrupt_row(id, e))?;

        Ok(GroceryItem {
            id,
            name: required(id, "name", row.name)?,
            pkg_unit,
            pkg_qty: required(id, "pkg_qty", row.pkg_qty)?,
            inv_unit,
            inv_qty: required(id, "inv_qty", row.inv_qty)?,
            price: required(id, "price", row.price)?,
            store: required(id, "store", row.store)?,
            date,
            sku,
            upc,
        })
    }
}

/// Repository for grocery item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
///
/// let stored = repo.add_item(&new_item).await?;
/// let all = repo.list_items().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts one item and returns it with its store-assigned id.
    ///
    /// A single `INSERT` statement: on failure nothing is written.
    /// Required-field presence is the caller's job (see `ItemForm`).
    ///
    /// ## Returns
    /// * `Ok(GroceryItem)` - Stored item
    /// * `Err(DbError::SchemaMissing)` - `items` table is absent
    /// * `Err(DbError::Closed)` - Database was closed
    pub async fn add_item(&self, item: &NewGroceryItem) -> DbResult<GroceryItem> {
        debug!(name = %item.name, store = %item.store, "Inserting item");

        let result = sqlx::query(
            r#"
            INSERT INTO items (
                name, pkg_unit, pkg_qty, inv_unit, inv_qty,
                price, store, date, sku, upc
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10
            )
            "#,
        )
        .bind(item.name.as_str())
        .bind(item.pkg_unit.label())
        .bind(item.pkg_qty)
        .bind(item.inv_unit.label())
        .bind(item.inv_qty)
        .bind(item.price)
        .bind(item.store.as_str())
        .bind(item.date.format("%Y-%m-%d").to_string())
        .bind(item.sku.as_ref().map(Sku::to_stored))
        .bind(item.upc.as_ref().map(Upc::to_stored))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Item inserted");

        Ok(item.clone().with_id(id))
    }

    /// Returns every item in insertion order.
    ///
    /// No filtering or paging: the whole table comes back.
    pub async fn list_items(&self) -> DbResult<Vec<GroceryItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(SELECT_ITEMS).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Loaded items");
        rows.into_iter().map(GroceryItem::try_from).collect()
    }

    /// Counts stored items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_item() -> NewGroceryItem {
        NewGroceryItem {
            name: "Sparkling Water".to_string(),
            pkg_unit: PackageUnit::Case,
            pkg_qty: 2.0,
            inv_unit: InventoryUnit::Count,
            inv_qty: 12.0,
            price: 8.49,
            store: "Corner Market".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            sku: Some(Sku::parse("4011").unwrap()),
            upc: Some(Upc::parse("036000291452").unwrap()),
        }
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let db = test_db().await;
        let repo = db.items();

        let stored = repo.add_item(&sample_item()).await.unwrap();
        assert!(stored.id > 0);

        let items = repo.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], stored);
        assert_eq!(items[0], sample_item().with_id(stored.id));
        assert_eq!(items[0].upc.as_ref().unwrap().as_str(), "036000291452");
    }

    #[tokio::test]
    async fn test_list_is_in_insertion_order() {
        let db = test_db().await;
        let repo = db.items();

        for name in ["Bread", "Apples", "Coffee"] {
            let item = NewGroceryItem {
                name: name.to_string(),
                sku: None,
                upc: None,
                ..sample_item()
            };
            repo.add_item(&item).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_items()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, ["Bread", "Apples", "Coffee"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_ensure_schema_keeps_rows() {
        let db = test_db().await;
        db.items().add_item(&sample_item()).await.unwrap();

        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();

        assert_eq!(db.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_database_fails_cleanly() {
        let db = test_db().await;
        let repo = db.items();
        db.close().await;

        assert!(matches!(
            repo.add_item(&sample_item()).await,
            Err(DbError::Closed)
        ));
        assert!(matches!(repo.list_items().await, Err(DbError::Closed)));
    }

    #[tokio::test]
    async fn test_missing_table_is_reported() {
        let db = test_db().await;
        sqlx::query("DROP TABLE items")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            db.items().add_item(&sample_item()).await,
            Err(DbError::SchemaMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_store_unchanged() {
        let db = test_db().await;
        let repo = db.items();
        repo.add_item(&sample_item()).await.unwrap();

        sqlx::query(
            "CREATE TRIGGER reject_items BEFORE INSERT ON items \
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(matches!(
            repo.add_item(&sample_item()).await,
            Err(DbError::QueryFailed(_))
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let db = test_db().await;
        sqlx::query(
            "INSERT INTO items (name, pkg_unit, pkg_qty, inv_unit, inv_qty, price, store, date) \
             VALUES ('Mystery', 'Crate', 1, 'Ct.', 1, 1, 'Somewhere', '2024-01-01')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(matches!(
            db.items().list_items().await,
            Err(DbError::CorruptRow { id: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_sku_with_leading_zeros_reads_back_equal() {
        let db = test_db().await;
        let repo = db.items();
        let item = NewGroceryItem {
            sku: Some(Sku::parse("007").unwrap()),
            ..sample_item()
        };

        let stored = repo.add_item(&item).await.unwrap();
        let listed = repo.list_items().await.unwrap();

        assert_eq!(listed[0], stored);
        assert_eq!(stored.sku.as_ref().unwrap().as_str(), "7");
    }

    #[tokio::test]
    async fn test_legacy_text_codes_are_read() {
        let db = test_db().await;
        sqlx::query(
            "INSERT INTO items (name, pkg_unit, pkg_qty, inv_unit, inv_qty, price, store, date, sku, upc) \
             VALUES ('Rice', 'Sack', 1, 'Kilograms', 5, 11.99, 'Co-op', '2023-03-04', '', ''), \
                    ('Milk', 'Bottle', 2, 'Gallons', 1, 4.29, 'Co-op', '2023-03-05', '4011', '036000291452')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let items = db.items().list_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, None);
        assert_eq!(items[0].upc, None);
        assert_eq!(items[1].sku.as_ref().unwrap().as_str(), "4011");
        assert_eq!(items[1].upc.as_ref().unwrap().as_str(), "036000291452");
    }

    #[tokio::test]
    async fn test_unreadable_legacy_values_are_corrupt_rows() {
        let db = test_db().await;
        sqlx::query(
            "INSERT INTO items (name, pkg_unit, pkg_qty, inv_unit, inv_qty, price, store, date, sku) \
             VALUES ('Beans', 'Bag', 1, 'Pounds', 2, 3.5, 'Co-op', '2023-03-04', 'n/a')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(matches!(
            db.items().list_items().await,
            Err(DbError::CorruptRow { id: 1, .. })
        ));

        sqlx::query("DELETE FROM items").execute(db.pool()).await.unwrap();
        sqlx::query(
            "INSERT INTO items (name, pkg_unit, pkg_qty, inv_unit, inv_qty, price, store, date) \
             VALUES (NULL, 'Bag', 1, 'Pounds', 2, 3.5, 'Co-op', '2023-03-04')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(matches!(
            db.items().list_items().await,
            Err(DbError::CorruptRow { id: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_template_is_copied_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.db");

        let seeded = Database::new(DbConfig::new(&template)).await.unwrap();
        seeded.items().add_item(&sample_item()).await.unwrap();
        seeded.close().await;

        let path = dir.path().join("data").join("grocer.db");
        let db = Database::new(DbConfig::new(&path).template_path(&template))
            .await
            .unwrap();

        let items = db.items().list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Sparkling Water");

        // Second open keeps the existing file.
        db.items().add_item(&sample_item()).await.unwrap();
        db.close().await;
        let reopened = Database::new(DbConfig::new(&path).template_path(&template))
            .await
            .unwrap();
        assert_eq!(reopened.items().count().await.unwrap(), 2);
        reopened.close().await;
    }
}
