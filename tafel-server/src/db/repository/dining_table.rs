//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active dining tables
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE is_active = true ORDER BY number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find all active tables in an area
    pub async fn find_by_area(&self, area_id: &str) -> RepoResult<Vec<DiningTable>> {
        let area_thing = self.base.parse_id(area_id)?;
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE area = $area AND is_active = true ORDER BY number",
            )
            .bind(("area", area_thing))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = self.base.parse_id(id)?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Resolve a batch of ids, erroring on the first unknown one
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<DiningTable>> {
        let mut tables = Vec::with_capacity(ids.len());
        for id in ids {
            let table = self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;
            tables.push(table);
        }
        Ok(tables)
    }

    /// Find table by number in area
    pub async fn find_by_number_in_area(
        &self,
        area: &RecordId,
        number: &str,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE area = $area AND number = $number LIMIT 1")
            .bind(("area", area.clone()))
            .bind(("number", number.to_string()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        // Check duplicate number in same area
        if self
            .find_by_number_in_area(&data.area, &data.number)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists in this area",
                data.number
            )));
        }

        let min_seats = data.min_seats.unwrap_or(1);
        let max_seats = data.max_seats.unwrap_or(4);
        if min_seats < 1 || max_seats < min_seats {
            return Err(RepoError::Validation(format!(
                "Invalid seat range {}..{}",
                min_seats, max_seats
            )));
        }

        let table = DiningTable {
            id: None,
            number: data.number,
            area: data.area,
            sub_area: data.sub_area,
            min_seats,
            max_seats,
            combinable: data.combinable.unwrap_or(true),
            is_active: true,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Update a dining table
    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;

        // Check duplicate number in area if changing number or area
        let check_area = data.area.as_ref().unwrap_or(&existing.area);
        let check_number = data.number.as_ref().unwrap_or(&existing.number);

        if data.number.is_some() || data.area.is_some() {
            if let Some(found) = self
                .find_by_number_in_area(check_area, check_number)
                .await?
                && found.id != existing.id
            {
                return Err(RepoError::Duplicate(format!(
                    "Table '{}' already exists in this area",
                    check_number
                )));
            }
        }

        let number = data.number.unwrap_or(existing.number);
        let area = data.area.unwrap_or(existing.area);
        let sub_area = data.sub_area.or(existing.sub_area);
        let min_seats = data.min_seats.unwrap_or(existing.min_seats);
        let max_seats = data.max_seats.unwrap_or(existing.max_seats);
        let combinable = data.combinable.unwrap_or(existing.combinable);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        if min_seats < 1 || max_seats < min_seats {
            return Err(RepoError::Validation(format!(
                "Invalid seat range {}..{}",
                min_seats, max_seats
            )));
        }

        // 手动构建 UPDATE 语句，避免 area 被序列化为字符串
        self.base
            .db()
            .query("UPDATE $thing SET number = $number, area = $area, sub_area = $sub_area, min_seats = $min_seats, max_seats = $max_seats, combinable = $combinable, is_active = $is_active")
            .bind(("thing", thing))
            .bind(("number", number))
            .bind(("area", area))
            .bind(("sub_area", sub_area))
            .bind(("min_seats", min_seats))
            .bind(("max_seats", max_seats))
            .bind(("combinable", combinable))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Hard delete a dining table
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
