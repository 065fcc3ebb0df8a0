//! 成绩评议表（PV）
//!
//! 总评 = Σ(score / max_points × weight) / Σweight × scale，保留两位小数。
//! 缺考按 0 分计并标记 absent。

use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub enum PvDecision {
    Admitted,
    Deferred,
}

impl std::fmt::Display for PvDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PvDecision::Admitted => write!(f, "admitted"),
            PvDecision::Deferred => write!(f, "deferred"),
        }
    }
}

// 表头中的考核列
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub struct PvColumn {
    pub assessment_id: i64,
    pub title: String,
    pub max_points: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub struct PvScore {
    pub assessment_id: i64,
    pub score: f64,
    pub absent: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub struct PvRow {
    pub student_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub scores: Vec<PvScore>,
    pub final_mark: f64,
    pub attendance_rate: f64,
    pub decision: PvDecision,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub struct PvSummary {
    pub student_count: u64,
    pub admitted_count: u64,
    pub class_average: f64,
    pub scale: f64,
    pub pass_mark: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub struct PvReport {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub academic_year: String,
    pub columns: Vec<PvColumn>,
    pub rows: Vec<PvRow>,
    pub summary: PvSummary,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 按列顺序对齐成绩；缺失的成绩记 0 分并标记缺考
pub fn align_scores(columns: &[PvColumn], grades: &[(i64, f64)]) -> Vec<PvScore> {
    columns
        .iter()
        .map(|c| match grades.iter().find(|(id, _)| *id == c.assessment_id) {
            Some((_, score)) => PvScore {
                assessment_id: c.assessment_id,
                score: *score,
                absent: false,
            },
            None => PvScore {
                assessment_id: c.assessment_id,
                score: 0.0,
                absent: true,
            },
        })
        .collect()
}

/// 加权总评，没有考核时为 0
pub fn weighted_final(columns: &[PvColumn], scores: &[PvScore], scale: f64) -> f64 {
    let total_weight: f64 = columns.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = columns
        .iter()
        .zip(scores)
        .map(|(c, s)| s.score / c.max_points * c.weight)
        .sum();
    round2(weighted / total_weight * scale)
}

pub fn decide(final_mark: f64, pass_mark: f64) -> PvDecision {
    if final_mark >= pass_mark {
        PvDecision::Admitted
    } else {
        PvDecision::Deferred
    }
}

pub fn summarize(rows: &[PvRow], scale: f64, pass_mark: f64) -> PvSummary {
    let student_count = rows.len() as u64;
    let admitted_count = rows
        .iter()
        .filter(|r| r.decision == PvDecision::Admitted)
        .count() as u64;
    let class_average = if rows.is_empty() {
        0.0
    } else {
        round2(rows.iter().map(|r| r.final_mark).sum::<f64>() / rows.len() as f64)
    };
    PvSummary {
        student_count,
        admitted_count,
        class_average,
        scale,
        pass_mark,
    }
}

impl PvReport {
    /// 导出为 CSV，每个考核一列，缺考写作 ABS
    pub fn to_csv(&self) -> crate::errors::Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["username".to_string(), "display_name".to_string()];
        header.extend(
            self.columns
                .iter()
                .map(|c| format!("{} (/{})", c.title, c.max_points)),
        );
        header.extend([
            format!("final (/{})", self.summary.scale),
            "attendance_rate".to_string(),
            "decision".to_string(),
        ]);
        writer.write_record(&header).map_err(csv_error)?;

        for row in &self.rows {
            let mut record = vec![
                row.username.clone(),
                row.display_name.clone().unwrap_or_default(),
            ];
            record.extend(row.scores.iter().map(|s| {
                if s.absent {
                    "ABS".to_string()
                } else {
                    format!("{:.2}", s.score)
                }
            }));
            record.extend([
                format!("{:.2}", row.final_mark),
                format!("{:.1}", row.attendance_rate),
                row.decision.to_string(),
            ]);
            writer.write_record(&record).map_err(csv_error)?;
        }

        writer
            .into_inner()
            .map_err(|e| crate::errors::PortalError::serialization(e.to_string()))
    }
}

fn csv_error(e: csv::Error) -> crate::errors::PortalError {
    crate::errors::PortalError::serialization(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<PvColumn> {
        vec![
            PvColumn {
                assessment_id: 1,
                title: "Midterm".into(),
                max_points: 20.0,
                weight: 1.0,
            },
            PvColumn {
                assessment_id: 2,
                title: "Final".into(),
                max_points: 40.0,
                weight: 2.0,
            },
        ]
    }

    #[test]
    fn test_weighted_final() {
        let cols = columns();
        let scores = align_scores(&cols, &[(1, 10.0), (2, 30.0)]);
        // (0.5*1 + 0.75*2) / 3 * 20 = 13.33
        assert_eq!(weighted_final(&cols, &scores, 20.0), 13.33);
    }

    #[test]
    fn test_missing_grade_counts_as_zero() {
        let cols = columns();
        let scores = align_scores(&cols, &[(2, 40.0)]);
        assert!(scores[0].absent);
        assert_eq!(scores[0].score, 0.0);
        assert!(!scores[1].absent);
        assert_eq!(weighted_final(&cols, &scores, 20.0), 13.33);
    }

    #[test]
    fn test_no_assessments() {
        assert_eq!(weighted_final(&[], &[], 20.0), 0.0);
    }

    #[test]
    fn test_decision_threshold() {
        assert_eq!(decide(10.0, 10.0), PvDecision::Admitted);
        assert_eq!(decide(9.99, 10.0), PvDecision::Deferred);
    }

    #[test]
    fn test_summary_and_csv() {
        let cols = columns();
        let make = |id: i64, name: &str, grades: &[(i64, f64)]| {
            let scores = align_scores(&cols, grades);
            let final_mark = weighted_final(&cols, &scores, 20.0);
            PvRow {
                student_id: id,
                username: name.into(),
                display_name: None,
                scores,
                final_mark,
                attendance_rate: 50.0,
                decision: decide(final_mark, 10.0),
            }
        };
        let rows = vec![
            make(1, "amina", &[(1, 20.0), (2, 40.0)]),
            make(2, "yacine", &[(1, 6.0)]),
        ];
        let summary = summarize(&rows, 20.0, 10.0);
        assert_eq!(summary.student_count, 2);
        assert_eq!(summary.admitted_count, 1);
        // (20 + 2) / 2
        assert_eq!(summary.class_average, 11.0);

        let report = PvReport {
            course_id: 1,
            course_code: "INF-301".into(),
            course_name: "Compilers".into(),
            academic_year: "2025-2026".into(),
            columns: cols.clone(),
            rows,
            summary,
        };
        let csv = String::from_utf8(report.to_csv().unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "username,display_name,Midterm (/20),Final (/40),final (/20),attendance_rate,decision"
        );
        assert_eq!(lines.next().unwrap(), "amina,,20.00,40.00,20.00,50.0,admitted");
        assert_eq!(lines.next().unwrap(), "yacine,,6.00,ABS,2.00,50.0,deferred");
    }
}
