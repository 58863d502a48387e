//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Dining table entity (桌台)
///
/// `sub_area` 是区域内的子分区 (如 "Saal" / "Wintergarten")，
/// 并桌校验要求成员同属一个子分区。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 桌号 (同一区域内唯一)
    pub number: String,
    /// Area reference
    #[serde(with = "serde_helpers::record_id")]
    pub area: RecordId,
    #[serde(default)]
    pub sub_area: Option<String>,
    /// 最少入座人数
    #[serde(default = "default_min_seats")]
    pub min_seats: i32,
    /// 最多入座人数
    #[serde(default = "default_max_seats")]
    pub max_seats: i32,
    /// 是否允许并桌 (固定不可并桌的桌台设为 false)
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub combinable: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_min_seats() -> i32 {
    1
}

fn default_max_seats() -> i32 {
    4
}

impl DiningTable {
    /// 座位范围是否容纳给定人数
    pub fn fits_party(&self, party_size: i32) -> bool {
        party_size >= self.min_seats && party_size <= self.max_seats
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub area: RecordId,
    pub sub_area: Option<String>,
    pub min_seats: Option<i32>,
    pub max_seats: Option<i32>,
    pub combinable: Option<bool>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub area: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_seats: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_seats: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combinable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
