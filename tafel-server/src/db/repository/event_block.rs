//! Event Block Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{EventBlock, EventBlockCreate, EventBlockUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "event_block";

#[derive(Clone)]
pub struct EventBlockRepository {
    base: BaseRepository,
}

impl EventBlockRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all event blocks for a date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<EventBlock>> {
        let blocks: Vec<EventBlock> = self
            .base
            .db()
            .query("SELECT * FROM event_block WHERE date = $date ORDER BY start_time")
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(blocks)
    }

    /// Find event block by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<EventBlock>> {
        let thing = self.base.parse_id(id)?;
        let block: Option<EventBlock> = self.base.db().select(thing).await?;
        Ok(block)
    }

    /// Create a new event block
    pub async fn create(&self, data: EventBlockCreate) -> RepoResult<EventBlock> {
        let full_day = data.full_day.unwrap_or(false);
        if !full_day && (data.start_time.is_none() || data.end_time.is_none()) {
            return Err(RepoError::Validation(
                "Event block needs start_time and end_time unless full_day".into(),
            ));
        }

        let area: Option<RecordId> = match data.area {
            Some(a) => Some(self.base.parse_id(&a)?),
            None => None,
        };

        let block = EventBlock {
            id: None,
            name: data.name,
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
            full_day,
            area,
            description: data.description,
        };

        let created: Option<EventBlock> = self.base.db().create(TABLE).content(block).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create event block".to_string()))
    }

    /// Update an event block
    pub async fn update(&self, id: &str, data: EventBlockUpdate) -> RepoResult<EventBlock> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Event block {} not found", id)))?;

        let area: Option<RecordId> = match data.area {
            Some(a) => Some(self.base.parse_id(&a)?),
            None => existing.area,
        };

        let name = data.name.unwrap_or(existing.name);
        let date = data.date.unwrap_or(existing.date);
        let start_time = data.start_time.or(existing.start_time);
        let end_time = data.end_time.or(existing.end_time);
        let full_day = data.full_day.unwrap_or(existing.full_day);
        let description = data.description.or(existing.description);

        if !full_day && (start_time.is_none() || end_time.is_none()) {
            return Err(RepoError::Validation(
                "Event block needs start_time and end_time unless full_day".into(),
            ));
        }

        self.base
            .db()
            .query("UPDATE $thing SET name = $name, date = $date, start_time = $start_time, end_time = $end_time, full_day = $full_day, area = $area, description = $description")
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("date", date))
            .bind(("start_time", start_time))
            .bind(("end_time", end_time))
            .bind(("full_day", full_day))
            .bind(("area", area))
            .bind(("description", description))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Event block {} not found", id)))
    }

    /// Hard delete an event block
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
