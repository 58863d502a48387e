//! Event Block Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Event block entity (活动/封场时段)
///
/// `area` 为空表示整店封锁；`full_day` 为 true 时忽略起止时间。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBlock {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// 日期 (YYYY-MM-DD)
    pub date: String,
    /// 起始时间 (HH:MM)
    pub start_time: Option<String>,
    /// 结束时间 (HH:MM, 不含)
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub full_day: bool,
    /// 限定区域，空 = 整店
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub area: Option<RecordId>,
    pub description: Option<String>,
}

/// Create event block payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBlockCreate {
    pub name: String,
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub full_day: Option<bool>,
    pub area: Option<String>,
    pub description: Option<String>,
}

/// Update event block payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBlockUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
