//! # examplan-id
//!
//! Typed identifiers for every examplan resource.
//!
//! All IDs share a prefixed format, `{prefix}_{ulid}`:
//!
//! - `crs_01JD2K8QXNVT5M9RHWYA3BZC6E` — a course
//! - `exam_01JD2K9PZQWU6N0SJXZB4CAD7F` — an exam
//! - `stu_01JD2KAQRT8V7P1TKYAC5DBE8G` — a student
//!
//! The prefix makes an ID self-describing in logs and API payloads, the ULID
//! body keeps IDs time-sortable, and the newtype per resource prevents a
//! room ID from being handed to a query expecting a student ID. Parsing is
//! strict: wrong prefix, missing separator, or a malformed ULID body all
//! fail with a specific [`IdError`].

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
