use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 出勤状态
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Excused, // 请假，计入出勤
}

impl AttendanceStatus {
    pub const PRESENT: &'static str = "present";
    pub const ABSENT: &'static str = "absent";
    pub const EXCUSED: &'static str = "excused";

    pub fn counts_as_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Excused)
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AttendanceStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的出勤状态: '{s}'. 支持的状态: present, absent, excused"
            ))
        })
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "{}", AttendanceStatus::PRESENT),
            AttendanceStatus::Absent => write!(f, "{}", AttendanceStatus::ABSENT),
            AttendanceStatus::Excused => write!(f, "{}", AttendanceStatus::EXCUSED),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AttendanceStatus::PRESENT => Ok(AttendanceStatus::Present),
            AttendanceStatus::ABSENT => Ok(AttendanceStatus::Absent),
            AttendanceStatus::EXCUSED => Ok(AttendanceStatus::Excused),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

/// 一次课堂签到会话，对应一个二维码令牌
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSession {
    pub id: i64,
    pub course_id: i64,
    // YYYY-MM-DD
    pub session_date: String,
    pub token: String,
    // 教师生成二维码时的位置
    pub latitude: f64,
    pub longitude: f64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AttendanceSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// 会话日期当天 00:00 UTC 起才可签到
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        NaiveDate::parse_from_str(&self.session_date, "%Y-%m-%d")
            .map(|date| now.date_naive() >= date)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub session_id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    // 与教师位置的距离（米），手动标记时为空
    pub distance_m: Option<f64>,
    pub checked_in_at: DateTime<Utc>,
}

/// 会话在当天 23:59:59 UTC 过期
pub fn session_expiry(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
        .and_utc()
}

/// 出勤率百分比，保留一位小数；没有会话时为 0
pub fn attendance_rate(attended: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = attended as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

/// 坐标有限且位于合法经纬度范围内
pub fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// 签到被拒绝的原因，按校验顺序排列
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInRejection {
    InvalidLocation,
    TokenExpired,
    NotYetOpen,
    NotEnrolled,
    OutOfRange { distance_m: f64 },
}

/// 令牌已找到后的签到判定，成功时返回学生与教师之间的距离
pub fn evaluate_check_in(
    session: &AttendanceSession,
    now: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    is_enrolled_student: bool,
    radius_m: f64,
) -> Result<f64, CheckInRejection> {
    if !valid_coordinates(latitude, longitude) {
        return Err(CheckInRejection::InvalidLocation);
    }
    if session.is_expired(now) {
        return Err(CheckInRejection::TokenExpired);
    }
    if !session.is_open(now) {
        return Err(CheckInRejection::NotYetOpen);
    }
    if !is_enrolled_student {
        return Err(CheckInRejection::NotEnrolled);
    }
    let distance_m = crate::utils::geo::haversine_distance(
        session.latitude,
        session.longitude,
        latitude,
        longitude,
    );
    if distance_m > radius_m {
        return Err(CheckInRejection::OutOfRange { distance_m });
    }
    Ok(distance_m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(expires_at: DateTime<Utc>) -> AttendanceSession {
        AttendanceSession {
            id: 1,
            course_id: 1,
            session_date: "2026-03-02".to_string(),
            token: "a".repeat(32),
            latitude: 36.7538,
            longitude: 3.0588,
            created_by: 2,
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn test_session_expiry_end_of_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let expiry = session_expiry(date);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_attendance_rate() {
        assert_eq!(attendance_rate(0, 0), 0.0);
        assert_eq!(attendance_rate(3, 4), 75.0);
        assert_eq!(attendance_rate(2, 3), 66.7);
        assert_eq!(attendance_rate(1, 3), 33.3);
        assert_eq!(attendance_rate(5, 5), 100.0);
    }

    #[test]
    fn test_excused_counts_as_attended() {
        assert!(AttendanceStatus::Present.counts_as_attended());
        assert!(AttendanceStatus::Excused.counts_as_attended());
        assert!(!AttendanceStatus::Absent.counts_as_attended());
    }

    #[test]
    fn test_valid_coordinates() {
        assert!(valid_coordinates(0.0, 0.0));
        assert!(valid_coordinates(-90.0, 180.0));
        assert!(!valid_coordinates(90.1, 0.0));
        assert!(!valid_coordinates(0.0, -180.5));
        assert!(!valid_coordinates(f64::NAN, 0.0));
        assert!(!valid_coordinates(0.0, f64::INFINITY));
    }

    #[test]
    fn test_check_in_inside_radius() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let s = session(Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap());
        // 约 50 米
        let d = evaluate_check_in(&s, now, 36.7542, 3.0590, true, 200.0).unwrap();
        assert!(d < 200.0);
    }

    #[test]
    fn test_check_in_outside_radius() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let s = session(Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap());
        match evaluate_check_in(&s, now, 36.7600, 3.0588, true, 200.0) {
            Err(CheckInRejection::OutOfRange { distance_m }) => assert!(distance_m > 600.0),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_check_in_rejection_order() {
        let expired_at = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let s = session(expired_at);
        // 坐标无效优先于过期
        assert_eq!(
            evaluate_check_in(&s, now, 120.0, 0.0, false, 200.0),
            Err(CheckInRejection::InvalidLocation)
        );
        // 过期优先于未选课
        assert_eq!(
            evaluate_check_in(&s, now, 36.7538, 3.0588, false, 200.0),
            Err(CheckInRejection::TokenExpired)
        );
        let open = session(Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap());
        assert_eq!(
            evaluate_check_in(&open, now, 36.7538, 3.0588, false, 200.0),
            Err(CheckInRejection::NotEnrolled)
        );
    }

    #[test]
    fn test_check_in_before_session_date() {
        let s = session(Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap());
        let day_before = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(
            evaluate_check_in(&s, day_before, 36.7538, 3.0588, true, 200.0),
            Err(CheckInRejection::NotYetOpen)
        );
        let midnight = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert!(evaluate_check_in(&s, midnight, 36.7538, 3.0588, true, 200.0).is_ok());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap();
        let s = session(expires_at);
        assert!(!s.is_expired(expires_at));
        assert!(s.is_expired(expires_at + chrono::Duration::seconds(1)));
    }
}
