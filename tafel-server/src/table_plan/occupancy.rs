//! Occupancy Aggregator
//!
//! 桌台状态看板：把桌台主数据、预订、并桌与封场 join 成
//! 每桌唯一状态。纯 join/filter，无持久状态机。

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;
use surrealdb::RecordId;

use crate::availability::grid::SlotGrid;
use crate::availability::resolver::{block_applies_to_area, block_covers_window};
use crate::db::models::{
    DiningTable, EventBlock, Reservation, ReservationStatus, TableCombination,
};

/// 桌台状态 (优先级升序，取最高者)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Free,
    Reserved,
    Occupied,
    Blocked,
}

/// 单桌占用信息
#[derive(Debug, Clone, Serialize)]
pub struct TableOccupancy {
    pub table: String,
    pub number: String,
    pub area: String,
    pub sub_area: Option<String>,
    pub max_seats: i32,
    pub status: TableStatus,
    /// 决定状态的预订 (blocked 时为空)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_size: Option<i32>,
    /// 所属并桌
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combination: Option<String>,
}

/// 并桌占用信息 (成员状态取最差)
#[derive(Debug, Clone, Serialize)]
pub struct CombinationOccupancy {
    pub combination: String,
    pub tables: Vec<String>,
    pub total_capacity: i32,
    pub status: TableStatus,
}

/// 占用看板
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyBoard {
    pub date: String,
    pub time: String,
    pub tables: Vec<TableOccupancy>,
    pub combinations: Vec<CombinationOccupancy>,
}

/// 聚合一个时段窗口的桌台状态
///
/// 每张桌台恰好一个状态：blocked > occupied > reserved > free。
/// 两条重叠的未终态预订落在同一桌时取优先级高者，不重复计数。
pub fn aggregate(
    grid: &SlotGrid,
    date: NaiveDate,
    slot: NaiveTime,
    area_filter: Option<&RecordId>,
    tables: &[DiningTable],
    reservations: &[Reservation],
    combinations: &[TableCombination],
    blocks: &[EventBlock],
) -> OccupancyBoard {
    let win = grid.occupied_window(slot);
    let closed = grid.is_closed(date);

    // table id → 并桌 id
    let mut combo_of: HashMap<String, String> = HashMap::new();
    let active_combos: Vec<&TableCombination> = combinations
        .iter()
        .filter(|c| {
            NaiveTime::parse_from_str(&c.time, "%H:%M")
                .map(|t| grid.windows_overlap(t, slot))
                .unwrap_or(false)
        })
        .collect();
    for combo in &active_combos {
        let Some(cid) = combo.id.as_ref() else {
            continue;
        };
        for member in &combo.tables {
            combo_of.insert(member.to_string(), cid.to_string());
        }
    }

    let mut board_tables: Vec<TableOccupancy> = Vec::new();
    for table in tables.iter().filter(|t| t.is_active) {
        if let Some(area) = area_filter
            && &table.area != area
        {
            continue;
        }
        let Some(table_id) = table.id.as_ref() else {
            continue;
        };
        let key = table_id.to_string();

        let mut status = TableStatus::Free;
        let mut reservation_ref: Option<&Reservation> = None;

        if closed || blocks.iter().any(|b| {
            block_applies_to_area(b, &table.area) && block_covers_window(b, win)
        }) {
            status = TableStatus::Blocked;
        } else {
            // 重叠预订里取优先级最高的一条
            for r in reservations {
                if r.status.is_terminal() {
                    continue;
                }
                if r.table.as_ref().map(|t| t.to_string()) != Some(key.clone()) {
                    continue;
                }
                let Ok(r_time) = NaiveTime::parse_from_str(&r.time, "%H:%M") else {
                    continue;
                };
                if !grid.windows_overlap(r_time, slot) {
                    continue;
                }
                let candidate = match r.status {
                    ReservationStatus::Arrived => TableStatus::Occupied,
                    _ => TableStatus::Reserved,
                };
                if candidate > status {
                    status = candidate;
                    reservation_ref = Some(r);
                }
            }
        }

        board_tables.push(TableOccupancy {
            table: key.clone(),
            number: table.number.clone(),
            area: table.area.to_string(),
            sub_area: table.sub_area.clone(),
            max_seats: table.max_seats,
            status,
            reservation: reservation_ref
                .and_then(|r| r.id.as_ref())
                .map(|id| id.to_string()),
            guest_name: reservation_ref.map(|r| r.guest.name.clone()),
            party_size: reservation_ref.map(|r| r.party_size),
            combination: combo_of.get(&key).cloned(),
        });
    }

    // 并桌状态 = 成员最差状态
    let status_of: HashMap<String, TableStatus> = board_tables
        .iter()
        .map(|t| (t.table.clone(), t.status))
        .collect();
    let board_combos: Vec<CombinationOccupancy> = active_combos
        .iter()
        .filter_map(|c| {
            let cid = c.id.as_ref()?.to_string();
            let member_keys: Vec<String> = c.tables.iter().map(|id| id.to_string()).collect();
            // 区域过滤把成员都滤掉时不展示该并桌
            let statuses: Vec<TableStatus> = member_keys
                .iter()
                .filter_map(|k| status_of.get(k).copied())
                .collect();
            if statuses.is_empty() {
                return None;
            }
            Some(CombinationOccupancy {
                combination: cid,
                tables: member_keys,
                total_capacity: c.total_capacity,
                status: statuses.into_iter().max().unwrap_or(TableStatus::Free),
            })
        })
        .collect();

    OccupancyBoard {
        date: date.format("%Y-%m-%d").to_string(),
        time: slot.format("%H:%M").to_string(),
        tables: board_tables,
        combinations: board_combos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::GuestContact;
    use chrono::Weekday;

    fn grid() -> SlotGrid {
        SlotGrid::parse("18:00-22:00", 30, 4, Some(Weekday::Mon)).unwrap()
    }

    fn rid(table: &str, key: &str) -> RecordId {
        RecordId::from_table_key(table, key)
    }

    fn mk_table(key: &str, area: &str) -> DiningTable {
        DiningTable {
            id: Some(rid("dining_table", key)),
            number: key.to_string(),
            area: rid("area", area),
            sub_area: Some("Saal".to_string()),
            min_seats: 1,
            max_seats: 4,
            combinable: true,
            is_active: true,
        }
    }

    fn mk_reservation(key: &str, time: &str, table: &str, status: ReservationStatus) -> Reservation {
        Reservation {
            id: Some(rid("reservation", key)),
            date: "2025-03-14".to_string(),
            time: time.to_string(),
            party_size: 2,
            guest: GuestContact {
                name: "Gast".to_string(),
                phone: None,
                email: None,
            },
            status,
            table: Some(rid("dining_table", table)),
            event: None,
            note: None,
            created_at: 0,
        }
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn test_single_status_per_table_with_overlapping_reservations() {
        let tables = vec![mk_table("t1", "a1")];
        // 同一桌台两条重叠的未终态预订 (数据已经超订) → 仍只产生一个状态
        let reservations = vec![
            mk_reservation("r1", "19:00", "t1", ReservationStatus::Confirmed),
            mk_reservation("r2", "19:30", "t1", ReservationStatus::Arrived),
        ];
        let board = aggregate(
            &grid(),
            friday(),
            t("19:30"),
            None,
            &tables,
            &reservations,
            &[],
            &[],
        );
        assert_eq!(board.tables.len(), 1);
        let entry = &board.tables[0];
        assert_eq!(entry.status, TableStatus::Occupied);
        assert_eq!(entry.reservation.as_deref(), Some("reservation:r2"));
    }

    #[test]
    fn test_terminal_reservations_leave_table_free() {
        let tables = vec![mk_table("t1", "a1")];
        let reservations = vec![
            mk_reservation("r1", "19:00", "t1", ReservationStatus::Cancelled),
            mk_reservation("r2", "19:00", "t1", ReservationStatus::Completed),
        ];
        let board = aggregate(
            &grid(),
            friday(),
            t("19:00"),
            None,
            &tables,
            &reservations,
            &[],
            &[],
        );
        assert_eq!(board.tables[0].status, TableStatus::Free);
    }

    #[test]
    fn test_block_wins_over_reservation() {
        let tables = vec![mk_table("t1", "a1")];
        let reservations = vec![mk_reservation("r1", "19:00", "t1", ReservationStatus::Arrived)];
        let blocks = vec![EventBlock {
            id: Some(rid("event_block", "e1")),
            name: "Privatfeier".to_string(),
            date: "2025-03-14".to_string(),
            start_time: Some("18:00".to_string()),
            end_time: Some("22:00".to_string()),
            full_day: false,
            area: None,
            description: None,
        }];
        let board = aggregate(
            &grid(),
            friday(),
            t("19:00"),
            None,
            &tables,
            &reservations,
            &[],
            &blocks,
        );
        assert_eq!(board.tables[0].status, TableStatus::Blocked);
        assert!(board.tables[0].reservation.is_none());
    }

    #[test]
    fn test_closed_day_blocks_everything() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let tables = vec![mk_table("t1", "a1"), mk_table("t2", "a1")];
        let board = aggregate(&grid(), monday, t("19:00"), None, &tables, &[], &[], &[]);
        assert!(board
            .tables
            .iter()
            .all(|entry| entry.status == TableStatus::Blocked));
    }

    #[test]
    fn test_combination_reports_worst_member_status() {
        let tables = vec![mk_table("t1", "a1"), mk_table("t2", "a1")];
        let combos = vec![TableCombination {
            id: Some(rid("table_combination", "c1")),
            date: "2025-03-14".to_string(),
            time: "19:00".to_string(),
            tables: vec![rid("dining_table", "t1"), rid("dining_table", "t2")],
            total_capacity: 8,
            note: None,
            created_at: 0,
        }];
        let reservations = vec![mk_reservation("r1", "19:00", "t1", ReservationStatus::Confirmed)];
        let board = aggregate(
            &grid(),
            friday(),
            t("19:00"),
            None,
            &tables,
            &reservations,
            &combos,
            &[],
        );
        assert_eq!(board.combinations.len(), 1);
        assert_eq!(board.combinations[0].status, TableStatus::Reserved);
        // 成员桌台标注所属并桌
        assert!(board
            .tables
            .iter()
            .all(|entry| entry.combination.as_deref() == Some("table_combination:c1")));
    }

    #[test]
    fn test_area_filter_narrows_board() {
        let tables = vec![mk_table("t1", "a1"), mk_table("t2", "a2")];
        let a1 = rid("area", "a1");
        let board = aggregate(
            &grid(),
            friday(),
            t("19:00"),
            Some(&a1),
            &tables,
            &[],
            &[],
            &[],
        );
        assert_eq!(board.tables.len(), 1);
        assert_eq!(board.tables[0].number, "t1");
    }
}
