use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 课表时段，day_of_week 取 1（周一）到 7（周日）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleSlot {
    pub id: i64,
    pub course_id: i64,
    pub academic_year: String,
    pub day_of_week: i32,
    // HH:MM
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 解析 HH:MM，返回从零点起的分钟数
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// 校验星期与时间段，成功时返回 (开始, 结束) 分钟数
pub fn validate_slot(day_of_week: i32, start: &str, end: &str) -> Result<(u32, u32), String> {
    if !(1..=7).contains(&day_of_week) {
        return Err("day_of_week must be between 1 and 7".to_string());
    }
    let start_min = parse_hhmm(start).ok_or_else(|| format!("Invalid start time: {start}"))?;
    let end_min = parse_hhmm(end).ok_or_else(|| format!("Invalid end time: {end}"))?;
    if start_min >= end_min {
        return Err("start_time must be before end_time".to_string());
    }
    Ok((start_min, end_min))
}

/// 半开区间 [start, end) 是否相交，首尾相接不算冲突
pub fn overlaps(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

impl ScheduleSlot {
    pub fn minutes(&self) -> Option<(u32, u32)> {
        Some((parse_hhmm(&self.start_time)?, parse_hhmm(&self.end_time)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("08:30"), Some(510));
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("8:30"), None);
        assert_eq!(parse_hhmm("08-30"), None);
        assert_eq!(parse_hhmm("08:6a"), None);
    }

    #[test]
    fn test_validate_slot() {
        assert_eq!(validate_slot(1, "08:00", "09:30"), Ok((480, 570)));
        assert!(validate_slot(0, "08:00", "09:30").is_err());
        assert!(validate_slot(8, "08:00", "09:30").is_err());
        assert!(validate_slot(3, "10:00", "10:00").is_err());
        assert!(validate_slot(3, "11:00", "10:00").is_err());
    }

    #[test]
    fn test_overlaps() {
        assert!(overlaps((480, 570), (540, 600)));
        assert!(overlaps((480, 600), (500, 520)));
        assert!(!overlaps((480, 570), (570, 660)));
        assert!(!overlaps((600, 660), (480, 600)));
    }
}
