//! Student API endpoints.
//!
//! Roster listing with filters, bulk import, and the student-facing views
//! of notifications and seat assignments.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use examplan_id::{RequestId, StudentId};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::db::{NewStudent, SemesterParity, StudentRecord, StudentSeat};
use crate::state::AppState;

/// Create student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/import", post(import_students))
        .route("/{student_id}/notifications", get(list_notifications))
        .route("/{student_id}/seat-assignments", get(list_seat_assignments))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Filters for listing students.
#[derive(Debug, Default, Deserialize)]
pub struct ListStudentsQuery {
    /// Restrict to one branch.
    pub branch: Option<String>,

    /// Restrict to one semester.
    pub semester: Option<i16>,

    /// Restrict to odd or even semesters.
    pub semester_parity: Option<String>,
}

/// Response for a single student.
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    /// Student ID.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Registration number.
    pub usn: String,

    /// Branch code.
    pub branch: String,

    /// Enrolled semester.
    pub semester: i16,
}

impl From<StudentRecord> for StudentResponse {
    fn from(record: StudentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            usn: record.usn,
            branch: record.branch,
            semester: record.semester,
        }
    }
}

/// Response for listing students.
#[derive(Debug, Serialize)]
pub struct ListStudentsResponse {
    /// Students ordered by (branch, semester, usn).
    pub items: Vec<StudentResponse>,

    /// Total count.
    pub total: i64,
}

/// One row of a bulk import. Fields are optional so a bad row is skipped
/// instead of failing the whole import.
#[derive(Debug, Deserialize)]
pub struct ImportStudentRow {
    pub name: Option<String>,
    pub usn: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<i16>,
}

impl ImportStudentRow {
    /// Returns the validated insert input, or `None` when a field is missing
    /// or blank.
    fn into_new_student(self) -> Option<NewStudent> {
        let name = self.name.filter(|s| !s.trim().is_empty())?;
        let usn = self.usn.filter(|s| !s.trim().is_empty())?;
        let branch = self.branch.filter(|s| !s.trim().is_empty())?;
        let semester = self.semester.filter(|s| (1..=12).contains(s))?;
        Some(NewStudent {
            name,
            usn,
            branch,
            semester,
        })
    }
}

/// Response for a bulk import.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ImportStudentsResponse {
    /// Summary message.
    pub message: String,

    /// Rows inserted.
    pub inserted: usize,

    /// Rows skipped (missing fields or duplicate registration number).
    pub skipped: usize,
}

/// Response for one notification.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: String,

    /// Message text.
    pub message: String,

    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Response for listing a student's notifications.
#[derive(Debug, Serialize)]
pub struct ListNotificationsResponse {
    /// Notifications, newest first.
    pub items: Vec<NotificationResponse>,

    /// Total count.
    pub total: i64,
}

/// One seat as shown to the student holding it.
#[derive(Debug, Serialize)]
pub struct StudentSeatResponse {
    /// 1-based seat number.
    pub seat_number: i32,

    /// Room name.
    pub room_name: String,

    /// Examined course.
    pub course_name: String,

    /// Exam date.
    pub exam_date: NaiveDate,

    /// Exam start time.
    pub start_time: NaiveTime,

    /// Exam end time.
    pub end_time: NaiveTime,
}

impl From<StudentSeat> for StudentSeatResponse {
    fn from(seat: StudentSeat) -> Self {
        Self {
            seat_number: seat.seat_number,
            room_name: seat.room_name,
            course_name: seat.course_name,
            exam_date: seat.exam_date,
            start_time: seat.start_time,
            end_time: seat.end_time,
        }
    }
}

/// Response for listing a student's seats.
#[derive(Debug, Serialize)]
pub struct ListStudentSeatsResponse {
    /// Seats ordered by exam date and start time.
    pub items: Vec<StudentSeatResponse>,

    /// Total count.
    pub total: i64,
}

fn parse_parity(raw: Option<&str>) -> Result<Option<SemesterParity>, ()> {
    match raw {
        None => Ok(None),
        Some(s) => match s.to_lowercase().as_str() {
            "odd" => Ok(Some(SemesterParity::Odd)),
            "even" => Ok(Some(SemesterParity::Even)),
            _ => Err(()),
        },
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List students with optional filters.
///
/// GET /v1/students?branch=CSE&semester=3&semester_parity=odd
async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<ListStudentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    let Ok(parity) = parse_parity(query.semester_parity.as_deref()) else {
        return Err(ApiError::bad_request(
            "invalid_semester_parity",
            "semester_parity must be 'odd' or 'even'",
        )
        .with_request_id(request_id.to_string()));
    };

    match state
        .db()
        .students()
        .list(query.branch.as_deref(), query.semester, parity)
        .await
    {
        Ok(records) => {
            let items: Vec<StudentResponse> =
                records.into_iter().map(StudentResponse::from).collect();
            let total = items.len() as i64;
            Ok(Json(ListStudentsResponse { items, total }))
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to list students");
            Err(ApiError::internal("internal_error", "Failed to list students")
                .with_request_id(request_id.to_string()))
        }
    }
}

/// Bulk-import students.
///
/// POST /v1/students/import
///
/// Accepts a JSON array of rows. Rows with missing or blank fields, or a
/// registration number that already exists, are skipped; the response
/// reports inserted and skipped counts.
async fn import_students(
    State(state): State<AppState>,
    Json(rows): Json<Vec<ImportStudentRow>>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    if rows.is_empty() {
        return Err(
            ApiError::bad_request("empty_import", "No student rows to import")
                .with_request_id(request_id.to_string()),
        );
    }

    let students = state.db().students();
    let mut inserted = 0;
    let mut skipped = 0;

    for row in rows {
        let Some(new) = row.into_new_student() else {
            skipped += 1;
            continue;
        };
        match students.insert_if_new(&new).await {
            Ok(true) => inserted += 1,
            Ok(false) => skipped += 1,
            Err(e) => {
                tracing::error!(error = %e, request_id = %request_id, "Failed to import students");
                return Err(
                    ApiError::internal("internal_error", "Failed to import students")
                        .with_request_id(request_id.to_string()),
                );
            }
        }
    }

    Ok((
        StatusCode::OK,
        Json(ImportStudentsResponse {
            message: format!("Upload complete: {inserted} inserted, {skipped} skipped."),
            inserted,
            skipped,
        }),
    ))
}

/// List a student's notifications, newest first.
///
/// GET /v1/students/{student_id}/notifications
async fn list_notifications(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    let Ok(student_id) = student_id.parse::<StudentId>() else {
        return Err(
            ApiError::bad_request("invalid_student_id", "Invalid student ID format")
                .with_request_id(request_id.to_string()),
        );
    };

    match state
        .db()
        .seating()
        .notifications_for_student(&student_id)
        .await
    {
        Ok(records) => {
            let items: Vec<NotificationResponse> = records
                .into_iter()
                .map(|r| NotificationResponse {
                    id: r.id.to_string(),
                    message: r.message,
                    created_at: r.created_at,
                })
                .collect();
            let total = items.len() as i64;
            Ok(Json(ListNotificationsResponse { items, total }))
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, student_id = %student_id, "Failed to list notifications");
            Err(
                ApiError::internal("internal_error", "Failed to list notifications")
                    .with_request_id(request_id.to_string()),
            )
        }
    }
}

/// List a student's seat assignments across exams.
///
/// GET /v1/students/{student_id}/seat-assignments
async fn list_seat_assignments(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    let Ok(student_id) = student_id.parse::<StudentId>() else {
        return Err(
            ApiError::bad_request("invalid_student_id", "Invalid student ID format")
                .with_request_id(request_id.to_string()),
        );
    };

    match state.db().seating().seats_for_student(&student_id).await {
        Ok(seats) => {
            let items: Vec<StudentSeatResponse> =
                seats.into_iter().map(StudentSeatResponse::from).collect();
            let total = items.len() as i64;
            Ok(Json(ListStudentSeatsResponse { items, total }))
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, student_id = %student_id, "Failed to list seat assignments");
            Err(
                ApiError::internal("internal_error", "Failed to list seat assignments")
                    .with_request_id(request_id.to_string()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_row_with_all_fields_is_accepted() {
        let row = ImportStudentRow {
            name: Some("Asha Rao".to_string()),
            usn: Some("1X20CS001".to_string()),
            branch: Some("CSE".to_string()),
            semester: Some(3),
        };
        let new = row.into_new_student().unwrap();
        assert_eq!(new.usn, "1X20CS001");
    }

    #[test]
    fn test_import_row_with_blank_field_is_skipped() {
        let row = ImportStudentRow {
            name: Some("  ".to_string()),
            usn: Some("1X20CS001".to_string()),
            branch: Some("CSE".to_string()),
            semester: Some(3),
        };
        assert!(row.into_new_student().is_none());
    }

    #[test]
    fn test_import_row_with_out_of_range_semester_is_skipped() {
        let row = ImportStudentRow {
            name: Some("Asha Rao".to_string()),
            usn: Some("1X20CS001".to_string()),
            branch: Some("CSE".to_string()),
            semester: Some(0),
        };
        assert!(row.into_new_student().is_none());
    }

    #[test]
    fn test_import_rows_deserialize_with_missing_fields() {
        let json = r#"[{"name": "Asha Rao"}, {"usn": "1X20CS001", "semester": 3}]"#;
        let rows: Vec<ImportStudentRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .into_iter()
            .all(|row| row.into_new_student().is_none()));
    }

    #[test]
    fn test_parse_parity() {
        assert_eq!(parse_parity(None).unwrap(), None);
        assert_eq!(
            parse_parity(Some("Odd")).unwrap(),
            Some(SemesterParity::Odd)
        );
        assert_eq!(
            parse_parity(Some("EVEN")).unwrap(),
            Some(SemesterParity::Even)
        );
        assert!(parse_parity(Some("both")).is_err());
    }
}
