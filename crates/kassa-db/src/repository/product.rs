//! # Product Repository
//!
//! Database operations for the per-bar product menus. Orders snapshot name
//! and price at sale time, so rows here may be edited or deactivated
//! without touching sale history.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kassa_core::validation::{validate_price_cents, validate_product_name};
use kassa_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product. Name and price are validated once here.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, bar_id, name, price_cents, sort_order, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.bar_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.sort_order)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, bar_id, name, price_cents, sort_order, is_active,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists a bar's sellable menu in button-grid order.
    pub async fn list_active(&self, bar_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, bar_id, name, price_cents, sort_order, is_active,
                   created_at, updated_at
            FROM products
            WHERE bar_id = ?1 AND is_active = 1
            ORDER BY sort_order, name
            "#,
        )
        .bind(bar_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use kassa_core::Bar;
    use uuid::Uuid;

    async fn seeded_bar(db: &Database) -> Bar {
        let bar = Bar {
            id: Uuid::new_v4().to_string(),
            event_id: "seefest-2026".to_string(),
            name: "Beer Garden".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        db.bars().insert(&bar).await.unwrap();
        bar
    }

    fn product(bar_id: &str, name: &str, price_cents: i64, sort_order: i64) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            bar_id: bar_id.to_string(),
            name: name.to_string(),
            price_cents,
            sort_order,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bar = seeded_bar(&db).await;
        let repo = db.products();

        let p = product(&bar.id, "Beer 0.5l", 250, 1);
        repo.insert(&p).await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Beer 0.5l");
        assert_eq!(loaded.price().cents(), 250);
    }

    #[tokio::test]
    async fn test_list_active_in_grid_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bar = seeded_bar(&db).await;
        let repo = db.products();

        repo.insert(&product(&bar.id, "Bratwurst", 300, 2)).await.unwrap();
        repo.insert(&product(&bar.id, "Beer 0.5l", 250, 1)).await.unwrap();

        let mut hidden = product(&bar.id, "Old Special", 400, 0);
        hidden.is_active = false;
        repo.insert(&hidden).await.unwrap();

        let menu = repo.list_active(&bar.id).await.unwrap();
        let names: Vec<&str> = menu.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Beer 0.5l", "Bratwurst"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_nonpositive_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bar = seeded_bar(&db).await;

        let p = product(&bar.id, "Free Beer", 0, 0);
        assert!(db.products().insert(&p).await.is_err());
    }
}
