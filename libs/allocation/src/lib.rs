//! # examplan-allocation
//!
//! The seat-allocation core of examplan.
//!
//! Given the ordered roster of students sitting an exam and the list of
//! available rooms in descending-capacity order, [`allocate`] deterministically
//! assigns every student a `(room, seat)` pair such that no room is filled
//! past its capacity and no room mixes students from more than two academic
//! branches (the anti-collusion rule). The run either produces a complete
//! [`SeatPlan`] — one assignment and one notification per student — or fails
//! with a single [`AllocationError`] and no partial output.
//!
//! The engine is a pure function of its two ordered inputs: no I/O, no
//! clocks, no hidden state. Fetching the roster and rooms, and persisting the
//! resulting plan atomically, are the caller's job. Callers must also
//! serialize allocation per exam; running the engine twice for the same exam
//! and persisting both outputs is a caller-side error.

mod engine;
mod error;
mod model;

pub use engine::{allocate, SeatPlan};
pub use error::AllocationError;
pub use model::{ExamContext, Notification, Room, SeatAssignment, Student};
