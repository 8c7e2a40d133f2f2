//! Allocation failure kinds.

use examplan_id::RoomId;
use thiserror::Error;

/// Why an allocation run failed.
///
/// Every kind is terminal for the run: the engine surfaces exactly one of
/// these and returns no partial assignments. Translating a kind into an HTTP
/// status or user-facing message is the caller's concern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// No students are registered for the exam's semester.
    #[error("no students found for the exam's semester")]
    EmptyRoster,

    /// The room list is empty.
    #[error("no rooms available")]
    NoRoomsAvailable,

    /// A third distinct branch arrived and no further room exists to open.
    #[error("not enough rooms to satisfy the two-branch mix rule")]
    InsufficientRoomsForBranchMix,

    /// Every room is full and students remain unseated.
    #[error("not enough room capacity to seat all students")]
    InsufficientCapacity,

    /// A room with a non-positive capacity reached the engine. Rejected
    /// before the pass starts.
    #[error("room {room_id} has invalid capacity {capacity}")]
    InvalidRoomConfiguration { room_id: RoomId, capacity: u32 },
}
