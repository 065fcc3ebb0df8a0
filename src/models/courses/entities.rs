use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    // 课程代码，例如 INF-301
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub credits: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程成员角色
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub enum EnrollmentRole {
    Professor, // 主讲教授，每学年每门课最多一位
    Assistant, // 助教
    Student,   // 选课学生
}

impl EnrollmentRole {
    pub const PROFESSOR: &'static str = "professor";
    pub const ASSISTANT: &'static str = "assistant";
    pub const STUDENT: &'static str = "student";

    pub fn staff_roles() -> &'static [&'static EnrollmentRole] {
        &[&Self::Professor, &Self::Assistant]
    }
    pub fn all_roles() -> &'static [&'static EnrollmentRole] {
        &[&Self::Professor, &Self::Assistant, &Self::Student]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, EnrollmentRole::Professor | EnrollmentRole::Assistant)
    }

    /// 教授 / 助教需要教学人员账号，学生角色需要学生账号
    pub fn accepts_account(&self, account: &UserRole) -> bool {
        match self {
            EnrollmentRole::Professor | EnrollmentRole::Assistant => *account == UserRole::User,
            EnrollmentRole::Student => *account == UserRole::Student,
        }
    }
}

impl<'de> Deserialize<'de> for EnrollmentRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<EnrollmentRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的课程角色: '{s}'. 支持的角色: professor, assistant, student"
            ))
        })
    }
}

impl std::fmt::Display for EnrollmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentRole::Professor => write!(f, "{}", EnrollmentRole::PROFESSOR),
            EnrollmentRole::Assistant => write!(f, "{}", EnrollmentRole::ASSISTANT),
            EnrollmentRole::Student => write!(f, "{}", EnrollmentRole::STUDENT),
        }
    }
}

impl std::str::FromStr for EnrollmentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EnrollmentRole::PROFESSOR => Ok(EnrollmentRole::Professor),
            EnrollmentRole::ASSISTANT => Ok(EnrollmentRole::Assistant),
            EnrollmentRole::STUDENT => Ok(EnrollmentRole::Student),
            _ => Err(format!("Invalid enrollment role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseEnrollment {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub role: EnrollmentRole,
    // 学年，格式 YYYY-YYYY
    pub academic_year: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 带用户信息的选课记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct EnrollmentWithUser {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: CourseEnrollment,
    pub username: String,
    pub display_name: Option<String>,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrollment_role_account_compatibility() {
        assert!(EnrollmentRole::Professor.accepts_account(&UserRole::User));
        assert!(EnrollmentRole::Assistant.accepts_account(&UserRole::User));
        assert!(!EnrollmentRole::Professor.accepts_account(&UserRole::Student));
        assert!(!EnrollmentRole::Professor.accepts_account(&UserRole::Admin));
        assert!(EnrollmentRole::Student.accepts_account(&UserRole::Student));
        assert!(!EnrollmentRole::Student.accepts_account(&UserRole::User));
    }

    #[test]
    fn enrollment_role_parsing() {
        assert_eq!("assistant".parse::<EnrollmentRole>().unwrap(), EnrollmentRole::Assistant);
        assert!(serde_json::from_str::<EnrollmentRole>(r#""teacher""#).is_err());
    }
}
