//! Slot Grid
//!
//! 固定时段网格：由营业时间窗口生成，粒度 `slot_minutes`，
//! 一个预订占用 `reservation_slots` 个连续时段 (在窗口末尾截断)。

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::utils::{AppError, AppResult, time};

/// 单个营业窗口 (如 12:00-14:30)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    pub start: NaiveTime,
    /// 不含
    pub end: NaiveTime,
}

/// 营业时段网格
#[derive(Debug, Clone)]
pub struct SlotGrid {
    windows: Vec<OpeningWindow>,
    slot_minutes: u32,
    reservation_slots: u32,
    closed_weekday: Option<Weekday>,
}

impl SlotGrid {
    /// 解析配置字符串，如 `"12:00-14:30,18:00-23:00"`
    pub fn parse(
        opening_hours: &str,
        slot_minutes: u32,
        reservation_slots: u32,
        closed_weekday: Option<Weekday>,
    ) -> AppResult<Self> {
        if slot_minutes == 0 || reservation_slots == 0 {
            return Err(AppError::validation(
                "slot_minutes and reservation_slots must be positive",
            ));
        }

        let mut windows = Vec::new();
        for part in opening_hours.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (from, to) = part.split_once('-').ok_or_else(|| {
                AppError::validation(format!("Invalid opening window: {}", part))
            })?;
            let start = time::parse_time(from.trim())?;
            let end = time::parse_time(to.trim())?;
            if end <= start {
                return Err(AppError::validation(format!(
                    "Opening window must end after it starts: {}",
                    part
                )));
            }
            windows.push(OpeningWindow { start, end });
        }

        if windows.is_empty() {
            return Err(AppError::validation("No opening windows configured"));
        }
        windows.sort_by_key(|w| w.start);

        Ok(Self {
            windows,
            slot_minutes,
            reservation_slots,
            closed_weekday,
        })
    }

    /// 每周固定休息日 (Ruhetag) 或无窗口的日期视为闭店
    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.closed_weekday == Some(date.weekday())
    }

    /// 生成当日全部时段起点 (闭店日为空)
    pub fn slots_for(&self, date: NaiveDate) -> Vec<NaiveTime> {
        if self.is_closed(date) {
            return Vec::new();
        }
        let step = chrono::Duration::minutes(self.slot_minutes as i64);
        let mut slots = Vec::new();
        for window in &self.windows {
            let mut t = window.start;
            while t < window.end {
                slots.push(t);
                t = t + step;
            }
        }
        slots
    }

    /// 时间是否正好落在网格上
    pub fn is_slot(&self, t: NaiveTime) -> bool {
        self.windows.iter().any(|w| {
            if t < w.start || t >= w.end {
                return false;
            }
            let offset = (t - w.start).num_minutes();
            offset % self.slot_minutes as i64 == 0
        })
    }

    /// 一个从 `start` 开始的预订占用的时间窗口 `[start, end)`
    ///
    /// 占用窗口在营业窗口末尾截断；网格外的起点按完整时长计算。
    pub fn occupied_window(&self, start: NaiveTime) -> (NaiveTime, NaiveTime) {
        let duration =
            chrono::Duration::minutes((self.slot_minutes * self.reservation_slots) as i64);
        let natural_end = start + duration;
        let end = self
            .windows
            .iter()
            .find(|w| start >= w.start && start < w.end)
            .map(|w| natural_end.min(w.end))
            .unwrap_or(natural_end);
        (start, end)
    }

    /// 两个预订起点的占用窗口是否重叠
    pub fn windows_overlap(&self, a: NaiveTime, b: NaiveTime) -> bool {
        let (a_start, a_end) = self.occupied_window(a);
        let (b_start, b_end) = self.occupied_window(b);
        a_start < b_end && b_start < a_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SlotGrid {
        SlotGrid::parse("12:00-14:30,18:00-23:00", 30, 4, Some(Weekday::Mon)).unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SlotGrid::parse("12:00", 30, 4, None).is_err());
        assert!(SlotGrid::parse("14:00-12:00", 30, 4, None).is_err());
        assert!(SlotGrid::parse("", 30, 4, None).is_err());
        assert!(SlotGrid::parse("12:00-14:00", 0, 4, None).is_err());
    }

    #[test]
    fn test_slots_cover_both_windows() {
        let slots = grid().slots_for(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        // 12:00..14:30 → 5 slots, 18:00..23:00 → 10 slots
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0], t("12:00"));
        assert_eq!(slots[4], t("14:00"));
        assert_eq!(slots[5], t("18:00"));
        assert_eq!(*slots.last().unwrap(), t("22:30"));
    }

    #[test]
    fn test_closed_weekday_has_no_slots() {
        // 2025-03-17 is a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        assert!(grid().is_closed(monday));
        assert!(grid().slots_for(monday).is_empty());
    }

    #[test]
    fn test_is_slot_respects_grid() {
        let g = grid();
        assert!(g.is_slot(t("12:30")));
        assert!(g.is_slot(t("22:30")));
        assert!(!g.is_slot(t("12:15")));
        assert!(!g.is_slot(t("15:00"))); // between windows
        assert!(!g.is_slot(t("23:00"))); // window end is exclusive
    }

    #[test]
    fn test_occupied_window_truncated_at_close() {
        let g = grid();
        let (start, end) = g.occupied_window(t("22:00"));
        assert_eq!(start, t("22:00"));
        assert_eq!(end, t("23:00"));

        let (_, end) = g.occupied_window(t("12:30"));
        assert_eq!(end, t("14:30"));
    }

    #[test]
    fn test_overlap_semantics() {
        let g = grid();
        // 18:00-20:00 vs 19:30-21:30 → overlap
        assert!(g.windows_overlap(t("18:00"), t("19:30")));
        // 18:00-20:00 vs 20:00-22:00 → back to back, no overlap
        assert!(!g.windows_overlap(t("18:00"), t("20:00")));
        // 午市与晚市互不重叠
        assert!(!g.windows_overlap(t("13:00"), t("18:00")));
    }
}
