//! Course API endpoints.
//!
//! Provides create and filtered-list operations for the course catalog.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use examplan_id::RequestId;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, FieldError};
use crate::db::{CourseRecord, NewCourse};
use crate::state::AppState;

/// Create course routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/", get(list_courses))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to create a course.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    /// Course name, e.g. "Data Structures".
    pub name: String,

    /// Course code, e.g. "CS301". Unique.
    pub code: String,

    /// Branch offering the course, e.g. "CSE".
    pub branch: String,

    /// Semester the course is taught in (1-12).
    pub semester: i16,
}

/// Response for a single course.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct CourseResponse {
    /// Course ID.
    pub id: String,

    /// Course name.
    pub name: String,

    /// Course code.
    pub code: String,

    /// Branch offering the course.
    pub branch: String,

    /// Semester the course is taught in.
    pub semester: i16,

    /// When the course was created.
    pub created_at: DateTime<Utc>,
}

impl From<CourseRecord> for CourseResponse {
    fn from(record: CourseRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            code: record.code,
            branch: record.branch,
            semester: record.semester,
            created_at: record.created_at,
        }
    }
}

/// Response for listing courses.
#[derive(Debug, Serialize)]
pub struct ListCoursesResponse {
    /// List of courses.
    pub items: Vec<CourseResponse>,

    /// Total count.
    pub total: i64,
}

/// Filters for listing courses.
#[derive(Debug, Default, Deserialize)]
pub struct ListCoursesQuery {
    /// Restrict to one branch.
    pub branch: Option<String>,

    /// Restrict to one semester.
    pub semester: Option<i16>,
}

fn validate_course(req: &CreateCourseRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (field, value) in [
        ("name", &req.name),
        ("code", &req.code),
        ("branch", &req.branch),
    ] {
        if value.trim().is_empty() {
            errors.push(FieldError {
                field: field.to_string(),
                message: "must not be empty".to_string(),
            });
        }
    }
    if !(1..=12).contains(&req.semester) {
        errors.push(FieldError {
            field: "semester".to_string(),
            message: "must be between 1 and 12".to_string(),
        });
    }
    errors
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new course.
///
/// POST /v1/courses
async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    let field_errors = validate_course(&req);
    if !field_errors.is_empty() {
        return Err(ApiError::bad_request("invalid_course", "All fields required")
            .with_request_id(request_id.to_string())
            .with_details(field_errors));
    }

    let new = NewCourse {
        name: req.name,
        code: req.code,
        branch: req.branch,
        semester: req.semester,
    };

    match state.db().courses().create(new).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(CourseResponse::from(record)))),
        Err(e) if e.is_unique_violation() => Err(ApiError::conflict(
            "duplicate_course_code",
            "A course with this code already exists",
        )
        .with_request_id(request_id.to_string())),
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to create course");
            Err(ApiError::internal("internal_error", "Failed to create course")
                .with_request_id(request_id.to_string()))
        }
    }
}

/// List courses, optionally filtered by branch and semester.
///
/// GET /v1/courses?branch=CSE&semester=3
async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    match state
        .db()
        .courses()
        .list(query.branch.as_deref(), query.semester)
        .await
    {
        Ok(records) => {
            let items: Vec<CourseResponse> =
                records.into_iter().map(CourseResponse::from).collect();
            let total = items.len() as i64;
            Ok(Json(ListCoursesResponse { items, total }))
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to list courses");
            Err(ApiError::internal("internal_error", "Failed to list courses")
                .with_request_id(request_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_request_deserialization() {
        let json = r#"{"name": "Data Structures", "code": "CS301", "branch": "CSE", "semester": 3}"#;
        let req: CreateCourseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.code, "CS301");
        assert_eq!(req.semester, 3);
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let req = CreateCourseRequest {
            name: " ".to_string(),
            code: "CS301".to_string(),
            branch: String::new(),
            semester: 3,
        };
        let errors = validate_course(&req);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "branch"]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_semester() {
        let req = CreateCourseRequest {
            name: "Data Structures".to_string(),
            code: "CS301".to_string(),
            branch: "CSE".to_string(),
            semester: 0,
        };
        let errors = validate_course(&req);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "semester");
    }

    #[test]
    fn test_list_query_defaults_to_no_filters() {
        let query: ListCoursesQuery = serde_json::from_str("{}").unwrap();
        assert!(query.branch.is_none());
        assert!(query.semester.is_none());
    }
}
