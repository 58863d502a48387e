//! Table Combination Validator
//!
//! 并桌规则：
//! - 至少两张互不相同的桌台
//! - 成员全部启用且允许并桌
//! - 成员同区域、同子分区
//! - 同一日期+时段内一张桌台只能属于一个并桌
//!
//! 通过后合并容量 = 成员 max_seats 之和。

use thiserror::Error;

use crate::db::models::{DiningTable, TableCombination};
use crate::utils::AppError;
use std::collections::HashSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombinationError {
    #[error("A combination needs at least two tables")]
    TooFewTables,

    #[error("Table '{0}' listed twice")]
    DuplicateMember(String),

    #[error("Table '{0}' is not active")]
    InactiveMember(String),

    #[error("Table '{0}' is not combinable")]
    NotCombinable(String),

    #[error("Tables span different areas")]
    MixedAreas,

    #[error("Tables span different sub-areas")]
    MixedSubAreas,

    #[error("Table '{0}' already belongs to a combination for this slot")]
    AlreadyCombined(String),
}

impl From<CombinationError> for AppError {
    fn from(err: CombinationError) -> Self {
        AppError::BusinessRule(err.to_string())
    }
}

/// 校验一组成员桌台能否在指定时段合并
///
/// `existing` 是同一日期+时段已生效的并桌 (排除正在被替换的那条)。
/// 返回合并后的总容量。
pub fn validate_members(
    members: &[DiningTable],
    existing: &[TableCombination],
) -> Result<i32, CombinationError> {
    if members.len() < 2 {
        return Err(CombinationError::TooFewTables);
    }

    let mut seen: HashSet<String> = HashSet::new();
    for table in members {
        let key = table
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| table.number.clone());
        if !seen.insert(key) {
            return Err(CombinationError::DuplicateMember(table.number.clone()));
        }
        if !table.is_active {
            return Err(CombinationError::InactiveMember(table.number.clone()));
        }
        if !table.combinable {
            return Err(CombinationError::NotCombinable(table.number.clone()));
        }
    }

    let first = &members[0];
    if members.iter().any(|t| t.area != first.area) {
        return Err(CombinationError::MixedAreas);
    }
    if members.iter().any(|t| t.sub_area != first.sub_area) {
        return Err(CombinationError::MixedSubAreas);
    }

    // 同时段重复并桌检查
    let taken: HashSet<String> = existing
        .iter()
        .flat_map(|c| c.tables.iter().map(|id| id.to_string()))
        .collect();
    for table in members {
        if let Some(id) = table.id.as_ref()
            && taken.contains(&id.to_string())
        {
            return Err(CombinationError::AlreadyCombined(table.number.clone()));
        }
    }

    Ok(members.iter().map(|t| t.max_seats).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn rid(table: &str, key: &str) -> RecordId {
        RecordId::from_table_key(table, key)
    }

    fn mk_table(key: &str, area: &str, sub: &str, combinable: bool) -> DiningTable {
        DiningTable {
            id: Some(rid("dining_table", key)),
            number: key.to_string(),
            area: rid("area", area),
            sub_area: Some(sub.to_string()),
            min_seats: 2,
            max_seats: 4,
            combinable,
            is_active: true,
        }
    }

    #[test]
    fn test_accepts_same_sub_area_and_sums_capacity() {
        let members = vec![
            mk_table("t1", "a1", "Saal", true),
            mk_table("t2", "a1", "Saal", true),
            mk_table("t3", "a1", "Saal", true),
        ];
        assert_eq!(validate_members(&members, &[]), Ok(12));
    }

    #[test]
    fn test_rejects_single_table() {
        let members = vec![mk_table("t1", "a1", "Saal", true)];
        assert_eq!(
            validate_members(&members, &[]),
            Err(CombinationError::TooFewTables)
        );
    }

    #[test]
    fn test_rejects_duplicate_member() {
        let members = vec![
            mk_table("t1", "a1", "Saal", true),
            mk_table("t1", "a1", "Saal", true),
        ];
        assert_eq!(
            validate_members(&members, &[]),
            Err(CombinationError::DuplicateMember("t1".to_string()))
        );
    }

    #[test]
    fn test_rejects_non_combinable() {
        let members = vec![
            mk_table("t1", "a1", "Saal", true),
            mk_table("t9", "a1", "Saal", false),
        ];
        assert_eq!(
            validate_members(&members, &[]),
            Err(CombinationError::NotCombinable("t9".to_string()))
        );
    }

    #[test]
    fn test_rejects_cross_area() {
        let members = vec![
            mk_table("t1", "a1", "Saal", true),
            mk_table("t2", "a2", "Saal", true),
        ];
        assert_eq!(
            validate_members(&members, &[]),
            Err(CombinationError::MixedAreas)
        );
    }

    #[test]
    fn test_rejects_cross_sub_area() {
        let members = vec![
            mk_table("t1", "a1", "Saal", true),
            mk_table("t2", "a1", "Wintergarten", true),
        ];
        assert_eq!(
            validate_members(&members, &[]),
            Err(CombinationError::MixedSubAreas)
        );
    }

    #[test]
    fn test_rejects_member_of_existing_combination() {
        let members = vec![
            mk_table("t1", "a1", "Saal", true),
            mk_table("t2", "a1", "Saal", true),
        ];
        let existing = vec![TableCombination {
            id: Some(rid("table_combination", "c1")),
            date: "2025-03-14".to_string(),
            time: "19:00".to_string(),
            tables: vec![rid("dining_table", "t2"), rid("dining_table", "t5")],
            total_capacity: 8,
            note: None,
            created_at: 0,
        }];
        assert_eq!(
            validate_members(&members, &existing),
            Err(CombinationError::AlreadyCombined("t2".to_string()))
        );
    }

    #[test]
    fn test_rejects_inactive_member() {
        let mut inactive = mk_table("t2", "a1", "Saal", true);
        inactive.is_active = false;
        let members = vec![mk_table("t1", "a1", "Saal", true), inactive];
        assert_eq!(
            validate_members(&members, &[]),
            Err(CombinationError::InactiveMember("t2".to_string()))
        );
    }
}
