//! Table Combination Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::TableCombination;
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "table_combination";

#[derive(Clone)]
pub struct TableCombinationRepository {
    base: BaseRepository,
}

impl TableCombinationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all combinations for a date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<TableCombination>> {
        let combos: Vec<TableCombination> = self
            .base
            .db()
            .query("SELECT * FROM table_combination WHERE date = $date ORDER BY time")
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(combos)
    }

    /// Find combinations for a date + slot
    pub async fn find_by_slot(&self, date: &str, slot: &str) -> RepoResult<Vec<TableCombination>> {
        let combos: Vec<TableCombination> = self
            .base
            .db()
            .query("SELECT * FROM table_combination WHERE date = $date AND time = $time")
            .bind(("date", date.to_string()))
            .bind(("time", slot.to_string()))
            .await?
            .take(0)?;
        Ok(combos)
    }

    /// Find combination by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<TableCombination>> {
        let thing = self.base.parse_id(id)?;
        let combo: Option<TableCombination> = self.base.db().select(thing).await?;
        Ok(combo)
    }

    /// Persist a validated combination
    pub async fn create(&self, mut combo: TableCombination) -> RepoResult<TableCombination> {
        combo.id = None;
        combo.created_at = time::now_millis();
        let created: Option<TableCombination> =
            self.base.db().create(TABLE).content(combo).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create combination".to_string()))
    }

    /// Hard delete a combination (解除并桌)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
