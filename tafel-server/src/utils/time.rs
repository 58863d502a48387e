//! 时间工具函数 — 餐厅墙钟时间
//!
//! 预订日期/时间一律使用餐厅本地的墙钟表示 (`YYYY-MM-DD` / `HH:MM`)，
//! repository 层只存字符串，时间戳字段统一为 Unix millis。

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 解析月份字符串 (YYYY-MM)，返回 (首日, 次月首日)
///
/// 调用方使用 `>= start && < end` (不含) 语义。
pub fn month_bounds(month: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid month format: {}", month)))?;
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    }
    .ok_or_else(|| AppError::internal(format!("Month overflow: {}", month)))?;
    Ok((start, end))
}

/// 解析星期配置 ("monday".."sunday")，失败返回 None
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// 当前 Unix 毫秒时间戳
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 当前时间 RFC3339 字符串 (报表生成时间等展示字段)
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let d = parse_date("2025-03-14").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("14.03.2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn test_month_bounds_year_rollover() {
        let (start, end) = month_bounds("2025-12").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("ruhetag"), None);
    }
}
