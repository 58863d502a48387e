//! Marketing Content Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Marketing channel enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketingChannel {
    Newsletter,
    Social,
    Website,
    Print,
}

/// Marketing content status (审批流)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentStatus {
    Draft,
    Review,
    Approved,
    Published,
    Archived,
}

impl ContentStatus {
    /// 审批流校验：当前状态能否迁移到目标状态
    ///
    /// draft → review → approved → published → archived，
    /// 外加 review → draft (退回作者)。
    pub fn can_transition(&self, to: ContentStatus) -> bool {
        use ContentStatus::*;
        matches!(
            (self, to),
            (Draft, Review)
                | (Review, Approved)
                | (Review, Draft)
                | (Approved, Published)
                | (Published, Archived)
        )
    }

    /// 内容正文是否还允许编辑
    pub fn is_editable(&self) -> bool {
        matches!(self, ContentStatus::Draft | ContentStatus::Review)
    }
}

/// Marketing content entity (营销素材)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingContent {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub title: String,
    pub body: String,
    pub channel: MarketingChannel,
    pub status: ContentStatus,
    /// 作者姓名 (无登录体系，自由文本)
    pub author: String,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// 最后修改时间 (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
    /// 发布时间 (Unix millis)
    pub published_at: Option<i64>,
}

/// Create marketing content payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarketingContentCreate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub body: String,
    pub channel: MarketingChannel,
    #[validate(length(min = 1, max = 120))]
    pub author: String,
}

/// Update marketing content payload (仅 draft/review 可编辑)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarketingContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<MarketingChannel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_happy_path() {
        use ContentStatus::*;
        assert!(Draft.can_transition(Review));
        assert!(Review.can_transition(Approved));
        assert!(Approved.can_transition(Published));
        assert!(Published.can_transition(Archived));
    }

    #[test]
    fn test_workflow_reject_back_to_draft() {
        assert!(ContentStatus::Review.can_transition(ContentStatus::Draft));
    }

    #[test]
    fn test_workflow_no_skips() {
        use ContentStatus::*;
        assert!(!Draft.can_transition(Approved));
        assert!(!Draft.can_transition(Published));
        assert!(!Approved.can_transition(Archived));
        assert!(!Archived.can_transition(Draft));
    }

    #[test]
    fn test_editable_only_before_approval() {
        use ContentStatus::*;
        assert!(Draft.is_editable());
        assert!(Review.is_editable());
        assert!(!Approved.is_editable());
        assert!(!Published.is_editable());
        assert!(!Archived.is_editable());
    }
}
