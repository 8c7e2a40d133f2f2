//! Room API endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use examplan_id::RequestId;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::db::{NewRoom, RoomRecord};
use crate::state::AppState;

/// Create room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_room))
        .route("/", get(list_rooms))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to create a room.
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    /// Room name, e.g. "LH-204".
    pub name: String,

    /// Number of seats. Must be at least 1.
    pub capacity: i32,
}

/// Response for a single room.
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    /// Room ID.
    pub id: String,

    /// Room name.
    pub name: String,

    /// Number of seats.
    pub capacity: i32,

    /// When the room was created.
    pub created_at: DateTime<Utc>,
}

impl From<RoomRecord> for RoomResponse {
    fn from(record: RoomRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            capacity: record.capacity,
            created_at: record.created_at,
        }
    }
}

/// Response for listing rooms.
#[derive(Debug, Serialize)]
pub struct ListRoomsResponse {
    /// Rooms in descending capacity order.
    pub items: Vec<RoomResponse>,

    /// Total count.
    pub total: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new room.
///
/// POST /v1/rooms
async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    if req.name.trim().is_empty() {
        return Err(
            ApiError::bad_request("invalid_room", "Room name must not be empty")
                .with_request_id(request_id.to_string()),
        );
    }
    if req.capacity < 1 {
        return Err(ApiError::bad_request(
            "invalid_room",
            "Room capacity must be at least 1",
        )
        .with_request_id(request_id.to_string()));
    }

    let new = NewRoom {
        name: req.name,
        capacity: req.capacity,
    };

    match state.db().rooms().create(new).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(RoomResponse::from(record)))),
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to create room");
            Err(ApiError::internal("internal_error", "Failed to create room")
                .with_request_id(request_id.to_string()))
        }
    }
}

/// List rooms in descending capacity order.
///
/// GET /v1/rooms
async fn list_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();

    match state.db().rooms().list_by_capacity_desc().await {
        Ok(records) => {
            let items: Vec<RoomResponse> = records.into_iter().map(RoomResponse::from).collect();
            let total = items.len() as i64;
            Ok(Json(ListRoomsResponse { items, total }))
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "Failed to list rooms");
            Err(ApiError::internal("internal_error", "Failed to list rooms")
                .with_request_id(request_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_request_deserialization() {
        let json = r#"{"name": "LH-204", "capacity": 40}"#;
        let req: CreateRoomRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "LH-204");
        assert_eq!(req.capacity, 40);
    }

    #[test]
    fn test_room_response_serialization() {
        let response = RoomResponse {
            id: "room_01JD2K8QXNVT5M9RHWYA3BZC6E".to_string(),
            name: "LH-204".to_string(),
            capacity: 40,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"capacity\":40"));
    }
}
