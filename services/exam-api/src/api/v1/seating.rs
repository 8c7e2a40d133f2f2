//! Seat allocation and seat-plan endpoints.
//!
//! `POST /v1/exams/{exam_id}/allocation` drives the whole allocation flow:
//! snapshot the ordered roster and room list, run the pure engine, and hand
//! the complete plan to the seating store for an all-or-nothing write. The
//! handler owns the duplicate-allocation guard; the engine itself never sees
//! the database.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use examplan_allocation::{allocate, AllocationError, ExamContext, Room, Student};
use examplan_id::{ExamId, RequestId};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::db::{DbError, RoomRecord, SeatPlanRow, StudentRecord};
use crate::state::AppState;

/// Create seating routes, nested under `/v1/exams`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{exam_id}/allocation", post(allocate_seats))
        .route("/{exam_id}/seat-plan", get(seat_plan))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Response for a successful allocation.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct AllocationResponse {
    /// Summary message.
    pub message: String,

    /// Number of students seated.
    pub students_assigned: usize,

    /// Number of rooms the plan uses.
    pub rooms_used: usize,
}

/// One row of the seat-plan report.
#[derive(Debug, Serialize)]
pub struct SeatPlanItem {
    pub student_name: String,
    pub usn: String,
    pub branch: String,
    pub semester: i16,
    pub course_name: String,
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_name: String,
    pub seat_number: i32,
}

impl From<SeatPlanRow> for SeatPlanItem {
    fn from(row: SeatPlanRow) -> Self {
        Self {
            student_name: row.student_name,
            usn: row.usn,
            branch: row.branch,
            semester: row.semester,
            course_name: row.course_name,
            exam_date: row.exam_date,
            start_time: row.start_time,
            end_time: row.end_time,
            room_name: row.room_name,
            seat_number: row.seat_number,
        }
    }
}

/// Response for the seat-plan report.
#[derive(Debug, Serialize)]
pub struct SeatPlanResponse {
    /// Report rows, ordered by room name then seat number.
    pub items: Vec<SeatPlanItem>,

    /// Total count.
    pub total: i64,
}

fn to_engine_student(record: StudentRecord) -> Student {
    Student {
        id: record.id,
        name: record.name,
        usn: record.usn,
        branch: record.branch,
        // Bounded 1..=12 by the schema CHECK constraint.
        semester: u8::try_from(record.semester).unwrap_or(0),
    }
}

fn to_engine_room(record: RoomRecord) -> Room {
    Room {
        id: record.id,
        name: record.name,
        // Non-positive capacity cannot pass the schema CHECK; a zero here is
        // rejected by the engine as InvalidRoomConfiguration.
        capacity: u32::try_from(record.capacity).unwrap_or(0),
    }
}

/// Maps an engine failure to the HTTP error surface.
///
/// Missing prerequisites are the caller's fault (400); exhausting rooms or
/// seats is a conflict between roster and room inventory (409); an invalid
/// room reaching the engine means corrupt data (500).
fn allocation_failure(err: &AllocationError) -> ApiError {
    match err {
        AllocationError::EmptyRoster => {
            ApiError::bad_request("empty_roster", "No students found for that semester")
        }
        AllocationError::NoRoomsAvailable => {
            ApiError::bad_request("no_rooms_available", "No rooms available")
        }
        AllocationError::InsufficientRoomsForBranchMix => ApiError::conflict(
            "insufficient_rooms_for_branch_mix",
            "Not enough rooms to satisfy the two-branch mix rule",
        ),
        AllocationError::InsufficientCapacity => ApiError::conflict(
            "insufficient_capacity",
            "Not enough room capacity to seat all students",
        ),
        AllocationError::InvalidRoomConfiguration { room_id, capacity } => ApiError::internal(
            "invalid_room_configuration",
            format!("Room {room_id} has invalid capacity {capacity}"),
        ),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Run seat allocation for an exam.
///
/// POST /v1/exams/{exam_id}/allocation
async fn allocate_seats(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    let Ok(exam_id) = exam_id.parse::<ExamId>() else {
        return Err(
            ApiError::bad_request("invalid_exam_id", "Invalid exam ID format")
                .with_request_id(request_id.to_string()),
        );
    };

    let internal = |e: &DbError| {
        tracing::error!(error = %e, request_id = %request_id, exam_id = %exam_id, "Allocation failed");
        ApiError::internal("internal_error", "Failed to allocate seats")
            .with_request_id(request_id.to_string())
    };

    // Resolve the exam and the course that defines the roster's semester.
    let exam = match state.db().exams().find_with_course(&exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return Err(
                ApiError::not_found("exam_not_found", format!("Exam {exam_id} not found"))
                    .with_request_id(request_id.to_string()),
            );
        }
        Err(e) => return Err(internal(&e)),
    };

    // Allocation runs once per exam. A plan that needs redoing must be
    // deleted explicitly first, never silently overwritten.
    match state.db().seating().has_assignments(&exam_id).await {
        Ok(false) => {}
        Ok(true) => {
            return Err(ApiError::conflict(
                "duplicate_allocation",
                format!("Exam {exam_id} already has a seat plan"),
            )
            .with_request_id(request_id.to_string()));
        }
        Err(e) => return Err(internal(&e)),
    }

    let roster: Vec<Student> = match state
        .db()
        .students()
        .roster_for_semester(exam.semester)
        .await
    {
        Ok(records) => records.into_iter().map(to_engine_student).collect(),
        Err(e) => return Err(internal(&e)),
    };

    let rooms: Vec<Room> = match state.db().rooms().list_by_capacity_desc().await {
        Ok(records) => records.into_iter().map(to_engine_room).collect(),
        Err(e) => return Err(internal(&e)),
    };

    let ctx = ExamContext {
        exam_id,
        course_name: exam.course_name.clone(),
    };

    let plan = match allocate(&ctx, &roster, &rooms) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::info!(error = %e, request_id = %request_id, exam_id = %exam_id, "Allocation rejected");
            return Err(allocation_failure(&e).with_request_id(request_id.to_string()));
        }
    };

    match state.db().seating().persist_plan(&exam_id, &plan).await {
        Ok(()) => {
            let response = AllocationResponse {
                message: "Seat allocation completed successfully".to_string(),
                students_assigned: plan.assignments.len(),
                rooms_used: plan.rooms_used(),
            };
            tracing::info!(
                request_id = %request_id,
                exam_id = %exam_id,
                students_assigned = response.students_assigned,
                rooms_used = response.rooms_used,
                "Seat plan persisted"
            );
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(DbError::AlreadyAllocated { .. }) => Err(ApiError::conflict(
            "duplicate_allocation",
            format!("Exam {exam_id} already has a seat plan"),
        )
        .with_request_id(request_id.to_string())),
        Err(e) => Err(internal(&e)),
    }
}

/// Fetch the seat-plan report for an exam.
///
/// GET /v1/exams/{exam_id}/seat-plan
async fn seat_plan(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    let Ok(exam_id) = exam_id.parse::<ExamId>() else {
        return Err(
            ApiError::bad_request("invalid_exam_id", "Invalid exam ID format")
                .with_request_id(request_id.to_string()),
        );
    };

    match state.db().seating().seat_plan_rows(&exam_id).await {
        Ok(rows) if rows.is_empty() => Err(ApiError::not_found(
            "seat_plan_not_found",
            format!("Exam {exam_id} has no seat plan"),
        )
        .with_request_id(request_id.to_string())),
        Ok(rows) => {
            let items: Vec<SeatPlanItem> = rows.into_iter().map(SeatPlanItem::from).collect();
            let total = items.len() as i64;
            Ok(Json(SeatPlanResponse { items, total }))
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, exam_id = %exam_id, "Failed to fetch seat plan");
            Err(ApiError::internal("internal_error", "Failed to fetch seat plan")
                .with_request_id(request_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rstest::rstest;

    #[rstest]
    #[case::empty_roster(AllocationError::EmptyRoster, StatusCode::BAD_REQUEST, "empty_roster")]
    #[case::no_rooms(
        AllocationError::NoRoomsAvailable,
        StatusCode::BAD_REQUEST,
        "no_rooms_available"
    )]
    #[case::branch_mix(
        AllocationError::InsufficientRoomsForBranchMix,
        StatusCode::CONFLICT,
        "insufficient_rooms_for_branch_mix"
    )]
    #[case::capacity(
        AllocationError::InsufficientCapacity,
        StatusCode::CONFLICT,
        "insufficient_capacity"
    )]
    fn test_allocation_failure_mapping(
        #[case] err: AllocationError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let api_err = allocation_failure(&err);
        assert_eq!(api_err.status, status);
        assert_eq!(api_err.problem.code, code);
    }

    #[test]
    fn test_invalid_room_configuration_maps_to_internal() {
        let err = AllocationError::InvalidRoomConfiguration {
            room_id: examplan_id::RoomId::new(),
            capacity: 0,
        };
        let api_err = allocation_failure(&err);
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_allocation_response_serialization() {
        let response = AllocationResponse {
            message: "Seat allocation completed successfully".to_string(),
            students_assigned: 42,
            rooms_used: 2,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"students_assigned\":42"));
        assert!(json.contains("\"rooms_used\":2"));
    }
}
