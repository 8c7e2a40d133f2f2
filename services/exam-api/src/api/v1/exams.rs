//! Exam API endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use examplan_id::{CourseId, RequestId};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::db::{ExamRecord, ExamWithCourse, NewExam};
use crate::state::AppState;

/// Create exam routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_exam))
        .route("/", get(list_exams))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to schedule an exam.
#[derive(Debug, Deserialize)]
pub struct CreateExamRequest {
    /// The course being examined.
    pub course_id: String,

    /// Date of the exam.
    pub exam_date: NaiveDate,

    /// Start time.
    pub start_time: NaiveTime,

    /// End time. Must be after `start_time`.
    pub end_time: NaiveTime,
}

/// Response for a single exam.
#[derive(Debug, Serialize)]
pub struct ExamResponse {
    /// Exam ID.
    pub id: String,

    /// The examined course.
    pub course_id: String,

    /// Date of the exam.
    pub exam_date: NaiveDate,

    /// Start time.
    pub start_time: NaiveTime,

    /// End time.
    pub end_time: NaiveTime,

    /// When the exam was created.
    pub created_at: DateTime<Utc>,
}

impl From<ExamRecord> for ExamResponse {
    fn from(record: ExamRecord) -> Self {
        Self {
            id: record.id.to_string(),
            course_id: record.course_id.to_string(),
            exam_date: record.exam_date,
            start_time: record.start_time,
            end_time: record.end_time,
            created_at: record.created_at,
        }
    }
}

/// An exam listed together with its course.
#[derive(Debug, Serialize)]
pub struct ExamListItem {
    /// Exam ID.
    pub id: String,

    /// Name of the examined course.
    pub course_name: String,

    /// Branch of the examined course.
    pub branch: String,

    /// Semester the course is taught in.
    pub semester: i16,

    /// Date of the exam.
    pub exam_date: NaiveDate,

    /// Start time.
    pub start_time: NaiveTime,

    /// End time.
    pub end_time: NaiveTime,
}

impl From<ExamWithCourse> for ExamListItem {
    fn from(record: ExamWithCourse) -> Self {
        Self {
            id: record.exam.id.to_string(),
            course_name: record.course_name,
            branch: record.branch,
            semester: record.semester,
            exam_date: record.exam.exam_date,
            start_time: record.exam.start_time,
            end_time: record.exam.end_time,
        }
    }
}

/// Response for listing exams.
#[derive(Debug, Serialize)]
pub struct ListExamsResponse {
    /// Exams ordered by (exam_date, branch).
    pub items: Vec<ExamListItem>,

    /// Total count.
    pub total: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Schedule a new exam.
///
/// POST /v1/exams
async fn create_exam(
    State(state): State<AppState>,
    Json(req): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    let Ok(course_id) = req.course_id.parse::<CourseId>() else {
        return Err(
            ApiError::bad_request("invalid_course_id", "Invalid course ID format")
                .with_request_id(request_id.to_string()),
        );
    };

    if req.end_time <= req.start_time {
        return Err(ApiError::bad_request(
            "invalid_exam_times",
            "Exam end time must be after its start time",
        )
        .with_request_id(request_id.to_string()));
    }

    match state.db().courses().find(&course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(ApiError::bad_request(
                "course_not_found",
                format!("Course {course_id} does not exist"),
            )
            .with_request_id(request_id.to_string()));
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to look up course");
            return Err(ApiError::internal("internal_error", "Failed to create exam")
                .with_request_id(request_id.to_string()));
        }
    }

    let new = NewExam {
        course_id,
        exam_date: req.exam_date,
        start_time: req.start_time,
        end_time: req.end_time,
    };

    match state.db().exams().create(new).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(ExamResponse::from(record)))),
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to create exam");
            Err(ApiError::internal("internal_error", "Failed to create exam")
                .with_request_id(request_id.to_string()))
        }
    }
}

/// List exams with their courses.
///
/// GET /v1/exams
async fn list_exams(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    match state.db().exams().list_with_courses().await {
        Ok(records) => {
            let items: Vec<ExamListItem> = records.into_iter().map(ExamListItem::from).collect();
            let total = items.len() as i64;
            Ok(Json(ListExamsResponse { items, total }))
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to list exams");
            Err(ApiError::internal("internal_error", "Failed to list exams")
                .with_request_id(request_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_exam_request_deserialization() {
        let json = r#"{
            "course_id": "crs_01JD2K8QXNVT5M9RHWYA3BZC6E",
            "exam_date": "2026-01-12",
            "start_time": "09:30:00",
            "end_time": "12:30:00"
        }"#;
        let req: CreateExamRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.exam_date, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
        assert!(req.end_time > req.start_time);
    }

    #[test]
    fn test_exam_list_item_serialization() {
        let item = ExamListItem {
            id: "exam_01JD2K8QXNVT5M9RHWYA3BZC6E".to_string(),
            course_name: "Data Structures".to_string(),
            branch: "CSE".to_string(),
            semester: 3,
            exam_date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"exam_date\":\"2026-01-12\""));
        assert!(json.contains("\"course_name\":\"Data Structures\""));
    }
}
