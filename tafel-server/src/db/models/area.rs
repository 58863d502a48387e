//! Area Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Area ID type
pub type AreaId = RecordId;

/// Area entity (座位区域：Restaurant、Terrasse 等)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AreaId>,
    pub name: String,
    pub description: Option<String>,
    /// 区域总容量 (covers)
    #[serde(default)]
    pub capacity: i32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create area payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaCreate {
    pub name: String,
    pub description: Option<String>,
    pub capacity: Option<i32>,
}

/// Update area payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
