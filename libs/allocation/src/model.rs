//! Input and output types for an allocation run.
//!
//! Inputs ([`Student`], [`Room`], [`ExamContext`]) are snapshots taken by the
//! caller before invoking the engine and are never mutated by it. Outputs
//! ([`SeatAssignment`], [`Notification`]) are the only records the engine
//! creates; the caller persists them as one atomic batch.

use examplan_id::{ExamId, RoomId, StudentId};
use serde::{Deserialize, Serialize};

/// A student on the roster for one exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student ID.
    pub id: StudentId,

    /// Display name.
    pub name: String,

    /// University registration number (USN). Unique per student.
    pub usn: String,

    /// Academic branch code, e.g. `CSE` or `ECE`.
    pub branch: String,

    /// Semester the student is enrolled in.
    pub semester: u8,
}

/// A physical room available for seating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room ID.
    pub id: RoomId,

    /// Display name, e.g. `LH-204`.
    pub name: String,

    /// Number of seats. Must be at least 1.
    pub capacity: u32,
}

/// The exam an allocation run is for.
///
/// Only the fields the engine actually needs: the exam's identity for the
/// assignment records and the course name for notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamContext {
    /// Exam ID.
    pub exam_id: ExamId,

    /// Name of the course being examined, used to label notifications.
    pub course_name: String,
}

/// One student seated in one room for one exam.
///
/// Within a single exam's plan, `(room_id, seat_number)` is unique, each
/// student appears at most once, and `seat_number` lies in
/// `1..=room.capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// The exam this seat belongs to.
    pub exam_id: ExamId,

    /// The room the student sits in.
    pub room_id: RoomId,

    /// 1-based seat number within the room.
    pub seat_number: u32,

    /// The seated student.
    pub student_id: StudentId,
}

/// A message telling one student where they sit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient.
    pub student_id: StudentId,

    /// Human-readable message naming the course, room, and seat.
    pub message: String,
}
