//! Marketing Content Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ContentStatus, MarketingContent, MarketingContentCreate};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "marketing_content";

#[derive(Clone)]
pub struct MarketingContentRepository {
    base: BaseRepository,
}

impl MarketingContentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all content, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<MarketingContent>> {
        let content: Vec<MarketingContent> = self
            .base
            .db()
            .query("SELECT * FROM marketing_content ORDER BY updated_at DESC")
            .await?
            .take(0)?;
        Ok(content)
    }

    /// Find content by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MarketingContent>> {
        let thing = self.base.parse_id(id)?;
        let content: Option<MarketingContent> = self.base.db().select(thing).await?;
        Ok(content)
    }

    /// Create new content in draft status
    pub async fn create(&self, data: MarketingContentCreate) -> RepoResult<MarketingContent> {
        let now = time::now_millis();
        let content = MarketingContent {
            id: None,
            title: data.title,
            body: data.body,
            channel: data.channel,
            status: ContentStatus::Draft,
            author: data.author,
            created_at: now,
            updated_at: now,
            published_at: None,
        };

        let created: Option<MarketingContent> =
            self.base.db().create(TABLE).content(content).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create content".to_string()))
    }

    /// Replace editable fields (审批流校验在调用方)
    pub async fn save_body(
        &self,
        id: &str,
        content: &MarketingContent,
    ) -> RepoResult<MarketingContent> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET title = $title, body = $body, channel = $channel, updated_at = $updated_at")
            .bind(("thing", thing))
            .bind(("title", content.title.clone()))
            .bind(("body", content.body.clone()))
            .bind(("channel", content.channel))
            .bind(("updated_at", time::now_millis()))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Content {} not found", id)))
    }

    /// Set workflow status; stamps published_at on publish
    pub async fn set_status(
        &self,
        id: &str,
        status: ContentStatus,
    ) -> RepoResult<MarketingContent> {
        let thing = self.base.parse_id(id)?;
        let now = time::now_millis();
        let published_at = if status == ContentStatus::Published {
            Some(now)
        } else {
            None
        };
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $updated_at, published_at = published_at ?? $published_at")
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("updated_at", now))
            .bind(("published_at", published_at))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Content {} not found", id)))
    }

    /// Hard delete content (draft only, 调用方校验)
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
