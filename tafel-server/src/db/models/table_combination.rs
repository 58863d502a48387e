//! Table Combination Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Table combination entity (并桌)
///
/// 针对具体日期+时段生效的临时合并，成员桌台须同区域同子分区。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCombination {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 生效日期 (YYYY-MM-DD)
    pub date: String,
    /// 生效时段起点 (HH:MM)
    pub time: String,
    /// 成员桌台 (>= 2)
    #[serde(with = "serde_helpers::vec_record_id")]
    pub tables: Vec<RecordId>,
    /// 合并后总容量 (成员 max_seats 之和)
    pub total_capacity: i32,
    pub note: Option<String>,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

/// Create table combination payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCombinationCreate {
    pub date: String,
    pub time: String,
    /// 成员桌台 ID ("dining_table:xxx")
    pub tables: Vec<String>,
    pub note: Option<String>,
}
