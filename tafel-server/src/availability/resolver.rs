//! Availability Resolver
//!
//! 给定日期、人数与可选区域，从时段网格出发做线性过滤：
//! 扣除休息日、活动封场、未终态预订占用后，输出仍有空位的时段。
//! 没有约束搜索，没有回溯 — 纯过滤与分组。

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::HashSet;
use surrealdb::RecordId;

use super::grid::SlotGrid;
use crate::db::models::{DiningTable, EventBlock, Reservation, TableCombination};

/// 单个时段的可用性
#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    /// 时段起点 (HH:MM)
    pub time: String,
    /// 可容纳该人数的空闲入座单元数 (单桌或并桌)
    pub free_units: usize,
}

/// 可用性查询结果
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResult {
    pub date: String,
    pub party_size: i32,
    pub slots: Vec<SlotAvailability>,
    /// 查询带了具体时间时：该时段是否开放
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_open: Option<bool>,
}

/// 活动封场是否覆盖查询窗口
///
/// 时间字段格式损坏的封场记录按不生效处理。
pub fn block_covers_window(block: &EventBlock, win: (NaiveTime, NaiveTime)) -> bool {
    if block.full_day {
        return true;
    }
    let parse = |s: &Option<String>| {
        s.as_deref()
            .and_then(|v| NaiveTime::parse_from_str(v, "%H:%M").ok())
    };
    match (parse(&block.start_time), parse(&block.end_time)) {
        (Some(start), Some(end)) => win.0 < end && start < win.1,
        _ => false,
    }
}

/// 封场是否作用于给定区域 (area 为空 = 整店)
pub fn block_applies_to_area(block: &EventBlock, area: &RecordId) -> bool {
    match &block.area {
        None => true,
        Some(a) => a == area,
    }
}

/// 解析一天的可用时段
///
/// 输入均为当日数据：`reservations` 只含未终态预订，
/// `combinations` 只含当日并桌。
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    grid: &SlotGrid,
    date: NaiveDate,
    party_size: i32,
    area_filter: Option<&RecordId>,
    requested_time: Option<NaiveTime>,
    tables: &[DiningTable],
    reservations: &[Reservation],
    combinations: &[TableCombination],
    blocks: &[EventBlock],
) -> AvailabilityResult {
    let date_str = date.format("%Y-%m-%d").to_string();
    let mut result = AvailabilityResult {
        date: date_str,
        party_size,
        slots: Vec::new(),
        requested_open: requested_time.map(|_| false),
    };

    if grid.is_closed(date) {
        return result;
    }

    // 候选桌台：启用 + 区域过滤
    let candidates: Vec<&DiningTable> = tables
        .iter()
        .filter(|t| t.is_active)
        .filter(|t| match area_filter {
            Some(area) => &t.area == area,
            None => true,
        })
        .collect();

    for slot in grid.slots_for(date) {
        let win = grid.occupied_window(slot);

        // 整店封场 → 时段关闭
        let whole_house_blocked = blocks
            .iter()
            .any(|b| b.area.is_none() && block_covers_window(b, win));
        if whole_house_blocked {
            continue;
        }

        // 分区封场 → 对应区域桌台不可用
        let blocked_areas: HashSet<String> = blocks
            .iter()
            .filter(|b| block_covers_window(b, win))
            .filter_map(|b| b.area.as_ref().map(|a| a.to_string()))
            .collect();

        // 已分配桌台的未终态预订 → 桌台占用
        let mut busy: HashSet<String> = HashSet::new();
        let mut unassigned: Vec<&Reservation> = Vec::new();
        for r in reservations {
            let Ok(r_time) = NaiveTime::parse_from_str(&r.time, "%H:%M") else {
                continue;
            };
            if !grid.windows_overlap(r_time, slot) {
                continue;
            }
            match &r.table {
                Some(table_id) => {
                    busy.insert(table_id.to_string());
                }
                None => unassigned.push(r),
            }
        }

        // 当前窗口内生效的并桌：成员不可单独入座
        let mut combo_members: HashSet<String> = HashSet::new();
        let active_combos: Vec<&TableCombination> = combinations
            .iter()
            .filter(|c| {
                NaiveTime::parse_from_str(&c.time, "%H:%M")
                    .map(|t| grid.windows_overlap(t, slot))
                    .unwrap_or(false)
            })
            .collect();
        for combo in &active_combos {
            for id in &combo.tables {
                combo_members.insert(id.to_string());
            }
        }

        let table_free = |t: &DiningTable| -> bool {
            let Some(id) = t.id.as_ref() else {
                return false;
            };
            let key = id.to_string();
            !busy.contains(&key)
                && !combo_members.contains(&key)
                && !blocked_areas.contains(&t.area.to_string())
        };

        // 空闲单桌 (升序，便于贪心扣减)
        let mut free_singles: Vec<&DiningTable> = candidates
            .iter()
            .copied()
            .filter(|t| table_free(t))
            .collect();
        free_singles.sort_by_key(|t| t.max_seats);

        // 该时段可整体预订的并桌：正好从本时段开始，全部成员空闲
        let mut free_combos: Vec<&TableCombination> = active_combos
            .iter()
            .copied()
            .filter(|c| c.time == slot.format("%H:%M").to_string())
            .filter(|c| {
                c.tables.iter().all(|id| {
                    let key = id.to_string();
                    !busy.contains(&key)
                        && candidates.iter().any(|t| {
                            t.id.as_ref().map(|tid| tid.to_string()) == Some(key.clone())
                                && !blocked_areas.contains(&t.area.to_string())
                        })
                })
            })
            .collect();
        free_combos.sort_by_key(|c| c.total_capacity);

        // 未分配桌台的预订仍然消耗容量：贪心扣掉最小的合适单元
        for r in &unassigned {
            if let Some(pos) = free_singles.iter().position(|t| t.fits_party(r.party_size)) {
                free_singles.remove(pos);
            } else if let Some(pos) = free_combos
                .iter()
                .position(|c| r.party_size <= c.total_capacity)
            {
                free_combos.remove(pos);
            }
            // 都不合适 → 已经超订，不再扣减
        }

        let free_units = free_singles
            .iter()
            .filter(|t| t.fits_party(party_size))
            .count()
            + free_combos
                .iter()
                .filter(|c| party_size <= c.total_capacity)
                .count();

        if free_units > 0 {
            let time_str = slot.format("%H:%M").to_string();
            if requested_time == Some(slot) {
                result.requested_open = Some(true);
            }
            result.slots.push(SlotAvailability {
                time: time_str,
                free_units,
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{GuestContact, ReservationStatus};
    use chrono::Weekday;

    fn grid() -> SlotGrid {
        SlotGrid::parse("18:00-22:00", 30, 4, Some(Weekday::Mon)).unwrap()
    }

    fn rid(table: &str, key: &str) -> RecordId {
        RecordId::from_table_key(table, key)
    }

    fn mk_table(key: &str, area: &str, sub: &str, min: i32, max: i32) -> DiningTable {
        DiningTable {
            id: Some(rid("dining_table", key)),
            number: key.to_string(),
            area: rid("area", area),
            sub_area: Some(sub.to_string()),
            min_seats: min,
            max_seats: max,
            combinable: true,
            is_active: true,
        }
    }

    fn mk_reservation(time: &str, party: i32, table: Option<&str>) -> Reservation {
        Reservation {
            id: Some(rid("reservation", "r")),
            date: "2025-03-14".to_string(),
            time: time.to_string(),
            party_size: party,
            guest: GuestContact {
                name: "Gast".to_string(),
                phone: None,
                email: None,
            },
            status: ReservationStatus::Confirmed,
            table: table.map(|t| rid("dining_table", t)),
            event: None,
            note: None,
            created_at: 0,
        }
    }

    fn friday() -> NaiveDate {
        // 2025-03-14 is a Friday
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_closed_day_has_zero_slots() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let tables = vec![mk_table("t1", "a1", "Saal", 1, 4)];
        let result = resolve(&grid(), monday, 2, None, None, &tables, &[], &[], &[]);
        assert!(result.slots.is_empty());
    }

    #[test]
    fn test_open_slot_counts_fitting_tables() {
        let tables = vec![
            mk_table("t1", "a1", "Saal", 1, 2),
            mk_table("t2", "a1", "Saal", 2, 4),
            mk_table("t3", "a1", "Saal", 4, 8),
        ];
        let result = resolve(&grid(), friday(), 2, None, None, &tables, &[], &[], &[]);
        // 18:00..22:00 → 8 slots, each with t1 + t2 fitting a party of 2
        assert_eq!(result.slots.len(), 8);
        assert!(result.slots.iter().all(|s| s.free_units == 2));
    }

    #[test]
    fn test_assigned_reservation_blocks_table_for_window() {
        let tables = vec![mk_table("t1", "a1", "Saal", 1, 4)];
        let reservations = vec![mk_reservation("19:00", 2, Some("t1"))];
        let result = resolve(
            &grid(),
            friday(),
            2,
            None,
            None,
            &tables,
            &reservations,
            &[],
            &[],
        );
        // 19:00 占用至 21:00，重叠窗口 17:30..21:00 内的时段全部满
        let open: Vec<&str> = result.slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(open, vec!["21:00", "21:30"]);
    }

    #[test]
    fn test_unassigned_reservation_consumes_capacity() {
        let tables = vec![mk_table("t1", "a1", "Saal", 1, 4)];
        let reservations = vec![mk_reservation("19:00", 2, None)];
        let result = resolve(
            &grid(),
            friday(),
            2,
            None,
            None,
            &tables,
            &reservations,
            &[],
            &[],
        );
        let open: Vec<&str> = result.slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(open, vec!["21:00", "21:30"]);
    }

    #[test]
    fn test_whole_house_event_block_closes_slots() {
        let tables = vec![mk_table("t1", "a1", "Saal", 1, 4)];
        let blocks = vec![EventBlock {
            id: Some(rid("event_block", "e1")),
            name: "Privatfeier".to_string(),
            date: "2025-03-14".to_string(),
            start_time: Some("18:00".to_string()),
            end_time: Some("20:00".to_string()),
            full_day: false,
            area: None,
            description: None,
        }];
        let result = resolve(&grid(), friday(), 2, None, None, &tables, &[], &[], &blocks);
        // 封场 18:00-20:00 → 起点在 16:30..20:00 的窗口都会撞上
        let open: Vec<&str> = result.slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(open, vec!["20:00", "20:30", "21:00", "21:30"]);
    }

    #[test]
    fn test_area_event_block_only_hits_that_area() {
        let tables = vec![
            mk_table("t1", "a1", "Saal", 1, 4),
            mk_table("t2", "a2", "Terrasse", 1, 4),
        ];
        let blocks = vec![EventBlock {
            id: Some(rid("event_block", "e1")),
            name: "Umbau".to_string(),
            date: "2025-03-14".to_string(),
            start_time: None,
            end_time: None,
            full_day: true,
            area: Some(rid("area", "a1")),
            description: None,
        }];
        let result = resolve(&grid(), friday(), 2, None, None, &tables, &[], &[], &blocks);
        // a1 全天封锁，只剩 a2 的一张桌
        assert!(result.slots.iter().all(|s| s.free_units == 1));

        let a1 = rid("area", "a1");
        let filtered = resolve(
            &grid(),
            friday(),
            2,
            Some(&a1),
            None,
            &tables,
            &[],
            &[],
            &blocks,
        );
        assert!(filtered.slots.is_empty());
    }

    #[test]
    fn test_combination_members_not_counted_twice() {
        let tables = vec![
            mk_table("t1", "a1", "Saal", 1, 4),
            mk_table("t2", "a1", "Saal", 1, 4),
        ];
        let combos = vec![TableCombination {
            id: Some(rid("table_combination", "c1")),
            date: "2025-03-14".to_string(),
            time: "19:00".to_string(),
            tables: vec![rid("dining_table", "t1"), rid("dining_table", "t2")],
            total_capacity: 8,
            note: None,
            created_at: 0,
        }];
        // 19:00 时段：两张单桌都是并桌成员，只剩并桌单元本身
        let result = resolve(&grid(), friday(), 6, None, None, &tables, &[], &combos, &[]);
        let at_1900 = result.slots.iter().find(|s| s.time == "19:00").unwrap();
        assert_eq!(at_1900.free_units, 1);
        // 并桌窗口外的时段对 6 人无可用单元 (单桌最多 4 人)
        assert!(!result.slots.iter().any(|s| s.time == "21:30"));
    }

    #[test]
    fn test_requested_time_flag() {
        let tables = vec![mk_table("t1", "a1", "Saal", 1, 4)];
        let reservations = vec![mk_reservation("19:00", 2, Some("t1"))];
        let requested = NaiveTime::parse_from_str("19:00", "%H:%M").unwrap();
        let result = resolve(
            &grid(),
            friday(),
            2,
            None,
            Some(requested),
            &tables,
            &reservations,
            &[],
            &[],
        );
        assert_eq!(result.requested_open, Some(false));

        let requested = NaiveTime::parse_from_str("21:00", "%H:%M").unwrap();
        let result = resolve(
            &grid(),
            friday(),
            2,
            None,
            Some(requested),
            &tables,
            &reservations,
            &[],
            &[],
        );
        assert_eq!(result.requested_open, Some(true));
    }
}
