//! # Bar Repository
//!
//! Database operations for bars (the sales points of the event).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kassa_core::validation::validate_product_name;
use kassa_core::Bar;

/// Repository for bar database operations.
#[derive(Debug, Clone)]
pub struct BarRepository {
    pool: SqlitePool,
}

impl BarRepository {
    /// Creates a new BarRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BarRepository { pool }
    }

    /// Inserts a bar. The display name is validated once here; it ends up
    /// on every receipt this bar prints.
    pub async fn insert(&self, bar: &Bar) -> DbResult<()> {
        validate_product_name(&bar.name)?;

        debug!(id = %bar.id, name = %bar.name, "Inserting bar");

        sqlx::query(
            r#"
            INSERT INTO bars (id, event_id, name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&bar.id)
        .bind(&bar.event_id)
        .bind(&bar.name)
        .bind(bar.is_active)
        .bind(bar.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a bar by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Bar>> {
        let bar = sqlx::query_as::<_, Bar>(
            r#"
            SELECT id, event_id, name, is_active, created_at
            FROM bars
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bar)
    }

    /// Lists the active bars of an event, for the stall picker.
    pub async fn list_active(&self, event_id: &str) -> DbResult<Vec<Bar>> {
        let bars = sqlx::query_as::<_, Bar>(
            r#"
            SELECT id, event_id, name, is_active, created_at
            FROM bars
            WHERE event_id = ?1 AND is_active = 1
            ORDER BY name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bars)
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
    use uuid::Uuid;

    fn bar(event_id: &str, name: &str) -> Bar {
        Bar {
            id: Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bars();

        let b = bar("seefest-2026", "Riverside Bar");
        repo.insert(&b).await.unwrap();

        let loaded = repo.get_by_id(&b.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Riverside Bar");
        assert_eq!(loaded.event_id, "seefest-2026");
        assert!(loaded.is_active);
    }

    #[tokio::test]
    async fn test_list_active_sorted_and_scoped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bars();

        repo.insert(&bar("seefest-2026", "Wine Stand")).await.unwrap();
        repo.insert(&bar("seefest-2026", "Beer Garden")).await.unwrap();
        repo.insert(&bar("other-event", "Elsewhere")).await.unwrap();

        let mut inactive = bar("seefest-2026", "Closed Bar");
        inactive.is_active = false;
        repo.insert(&inactive).await.unwrap();

        let bars = repo.list_active("seefest-2026").await.unwrap();
        let names: Vec<&str> = bars.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Beer Garden", "Wine Stand"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bars();

        let b = bar("seefest-2026", "   ");
        assert!(repo.insert(&b).await.is_err());
    }
}
