//! Area Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Area, AreaCreate, AreaUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "area";

#[derive(Clone)]
pub struct AreaRepository {
    base: BaseRepository,
}

impl AreaRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active areas
    pub async fn find_all(&self) -> RepoResult<Vec<Area>> {
        let areas: Vec<Area> = self
            .base
            .db()
            .query("SELECT * FROM area WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(areas)
    }

    /// Find area by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Area>> {
        let thing = self.base.parse_id(id)?;
        let area: Option<Area> = self.base.db().select(thing).await?;
        Ok(area)
    }

    /// Find area by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Area>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM area WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let areas: Vec<Area> = result.take(0)?;
        Ok(areas.into_iter().next())
    }

    /// Create a new area
    pub async fn create(&self, data: AreaCreate) -> RepoResult<Area> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Area '{}' already exists",
                data.name
            )));
        }

        let area = Area {
            id: None,
            name: data.name,
            description: data.description,
            capacity: data.capacity.unwrap_or(0),
            is_active: true,
        };

        let created: Option<Area> = self.base.db().create(TABLE).content(area).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create area".to_string()))
    }

    /// Update an area
    pub async fn update(&self, id: &str, data: AreaUpdate) -> RepoResult<Area> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Area {} not found", id)))?;

        if let Some(new_name) = &data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Area '{}' already exists",
                new_name
            )));
        }

        let name = data.name.unwrap_or(existing.name);
        let description = data.description.or(existing.description);
        let capacity = data.capacity.unwrap_or(existing.capacity);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query("UPDATE $thing SET name = $name, description = $description, capacity = $capacity, is_active = $is_active")
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("description", description))
            .bind(("capacity", capacity))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Area {} not found", id)))
    }

    /// Soft delete an area (桌台仍关联时拒绝)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM dining_table WHERE area = $area AND is_active = true GROUP ALL")
            .bind(("area", thing.clone()))
            .await?;
        let counts: Vec<serde_json::Value> = result.take(0)?;
        let count = counts
            .first()
            .and_then(|v| v.get("count"))
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        if count > 0 {
            return Err(RepoError::Validation(
                "Cannot delete area with active tables".into(),
            ));
        }

        self.base
            .db()
            .query("UPDATE $thing SET is_active = false")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
