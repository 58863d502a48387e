//! Reservation Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Reservation ID type
pub type ReservationId = RecordId;

/// Reservation status enum
///
/// 状态由前台直接操作推进，没有后台定时流转。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    New,
    Confirmed,
    Arrived,
    Completed,
    NoShow,
    Cancelled,
}

impl ReservationStatus {
    /// 终态预订不再占用桌台和时段
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed
                | ReservationStatus::NoShow
                | ReservationStatus::Cancelled
        )
    }

    /// 状态机校验：当前状态能否迁移到目标状态
    pub fn can_transition(&self, to: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, to),
            (New, Confirmed)
                | (New, Arrived)
                | (New, Cancelled)
                | (New, NoShow)
                | (Confirmed, Arrived)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (Arrived, Completed)
        )
    }
}

/// Guest contact (嵌入预订记录)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuestContact {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Reservation entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReservationId>,
    /// 预订日期 (YYYY-MM-DD)
    pub date: String,
    /// 入座时间 (HH:MM, 对齐时段网格)
    pub time: String,
    pub party_size: i32,
    pub guest: GuestContact,
    pub status: ReservationStatus,
    /// 已分配桌台 (可选)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table: Option<RecordId>,
    /// 关联活动 (包场、婚宴等)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub event: Option<RecordId>,
    pub note: Option<String>,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationCreate {
    pub date: String,
    pub time: String,
    #[validate(range(min = 1, max = 100))]
    pub party_size: i32,
    #[validate(nested)]
    pub guest: GuestContact,
    /// 直接指定桌台 (可选，须与人数和区域一致)
    pub table: Option<String>,
    pub event: Option<String>,
    pub note: Option<String>,
}

/// Update reservation payload
///
/// 状态迁移走专门的 action 接口，不走 update。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100))]
    pub party_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub guest: Option<GuestContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_forward_only() {
        use ReservationStatus::*;
        assert!(New.can_transition(Confirmed));
        assert!(Confirmed.can_transition(Arrived));
        assert!(Arrived.can_transition(Completed));
        // 终态不可再迁移
        assert!(!Completed.can_transition(Arrived));
        assert!(!Cancelled.can_transition(Confirmed));
        // 不可跳过入座直接完成
        assert!(!Confirmed.can_transition(Completed));
    }

    #[test]
    fn test_terminal_states() {
        use ReservationStatus::*;
        assert!(Completed.is_terminal());
        assert!(NoShow.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!New.is_terminal());
        assert!(!Arrived.is_terminal());
    }
}
