//! 成绩评议表（PV）生成与导出

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::collections::HashMap;

use super::CourseService;
use crate::config::AppConfig;
use crate::models::attendance::entities::attendance_rate;
use crate::models::courses::entities::EnrollmentRole;
use crate::models::courses::requests::EnrollmentQuery;
use crate::models::pv::entities::{
    PvColumn, PvReport, PvRow, align_scores, decide, summarize, weighted_final,
};
use crate::models::pv::requests::{PvFormat, PvQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::utils::validate::validate_academic_year;

pub async fn get_pv(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    query: PvQuery,
) -> ActixResult<HttpResponse> {
    let academic_year = query.academic_year.trim().to_string();
    if let Err(msg) = validate_academic_year(&academic_year) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;
    let config = AppConfig::get();

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get course", e)),
    };

    let students = match storage
        .list_course_enrollments(
            course_id,
            EnrollmentQuery {
                academic_year: Some(academic_year.clone()),
                role: Some(EnrollmentRole::Student),
            },
        )
        .await
    {
        Ok(students) => students,
        Err(e) => return Ok(internal_error("Failed to list students", e)),
    };

    let columns: Vec<PvColumn> = match storage.list_course_assessments(course_id).await {
        Ok(assessments) => assessments
            .into_iter()
            .map(|a| PvColumn {
                assessment_id: a.id,
                title: a.title,
                max_points: a.max_points,
                weight: a.weight,
            })
            .collect(),
        Err(e) => return Ok(internal_error("Failed to list assessments", e)),
    };

    // 按学生分组的 (assessment_id, score)
    let mut grades_by_student: HashMap<i64, Vec<(i64, f64)>> = HashMap::new();
    match storage.list_course_grades(course_id).await {
        Ok(grades) => {
            for g in grades {
                grades_by_student
                    .entry(g.student_id)
                    .or_default()
                    .push((g.assessment_id, g.score));
            }
        }
        Err(e) => return Ok(internal_error("Failed to list grades", e)),
    }

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let mut rows = Vec::with_capacity(students.len());
    for student in students {
        let student_id = student.enrollment.user_id;
        let grades = grades_by_student.remove(&student_id).unwrap_or_default();
        let scores = align_scores(&columns, &grades);
        let final_mark = weighted_final(&columns, &scores, config.pv.scale);

        let (attended, total) = match storage
            .student_attendance_counts(course_id, student_id, &today)
            .await
        {
            Ok(counts) => counts,
            Err(e) => return Ok(internal_error("Failed to count attendance", e)),
        };

        rows.push(PvRow {
            student_id,
            username: student.username,
            display_name: student.display_name,
            scores,
            final_mark,
            attendance_rate: attendance_rate(attended, total),
            decision: decide(final_mark, config.pv.pass_mark),
        });
    }

    let summary = summarize(&rows, config.pv.scale, config.pv.pass_mark);
    let report = PvReport {
        course_id,
        course_code: course.code,
        course_name: course.name,
        academic_year,
        columns,
        rows,
        summary,
    };

    match query.format.unwrap_or_default() {
        PvFormat::Json => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "PV generated successfully",
        ))),
        PvFormat::Csv => match report.to_csv() {
            Ok(body) => Ok(HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"pv-{}-{}.csv\"",
                        report.course_code, report.academic_year
                    ),
                ))
                .body(body)),
            Err(e) => Ok(internal_error("Failed to export PV", e)),
        },
    }
}
