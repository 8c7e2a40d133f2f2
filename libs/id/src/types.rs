//! Typed ID definitions for every examplan resource.

use crate::define_id;

// =============================================================================
// Academic catalog
// =============================================================================

define_id!(CourseId, "crs");
define_id!(ExamId, "exam");
define_id!(StudentId, "stu");

// =============================================================================
// Seating
// =============================================================================

define_id!(RoomId, "room");
define_id!(SeatAssignmentId, "seat");
define_id!(NotificationId, "ntf");

// =============================================================================
// Requests
// =============================================================================

define_id!(RequestId, "req");

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exam_id_roundtrip() {
        let id = ExamId::new();
        let s = id.to_string();
        let parsed: ExamId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_exam_id_prefix() {
        let s = ExamId::new().to_string();
        assert!(s.starts_with("exam_"));
    }

    #[test]
    fn test_room_id_rejects_student_prefix() {
        let result: Result<RoomId, _> = StudentId::new().to_string().parse();
        assert!(matches!(
            result.unwrap_err(),
            crate::IdError::InvalidPrefix { .. }
        ));
    }

    #[test]
    fn test_id_missing_separator() {
        let result: Result<RoomId, _> = "room01JD2K8QXNVT5M9RHWYA3BZC6E".parse();
        assert!(matches!(
            result.unwrap_err(),
            crate::IdError::MissingSeparator
        ));
    }

    #[test]
    fn test_id_empty() {
        let result: Result<StudentId, _> = "".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::Empty));
    }

    #[test]
    fn test_id_invalid_ulid_body() {
        let result: Result<StudentId, _> = "stu_not-a-ulid".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::InvalidUlid(_)));
    }

    #[test]
    fn test_id_json_is_plain_string() {
        let id = CourseId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: CourseId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_seat_assignment_id_sortable() {
        let id1 = SeatAssignmentId::new();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = SeatAssignmentId::new();
        // ULIDs are time-ordered
        assert!(id1 < id2);
    }

    #[test]
    fn test_all_id_prefixes_unique() {
        let prefixes = vec![
            CourseId::PREFIX,
            ExamId::PREFIX,
            StudentId::PREFIX,
            RoomId::PREFIX,
            SeatAssignmentId::PREFIX,
            NotificationId::PREFIX,
            RequestId::PREFIX,
        ];

        let unique: std::collections::HashSet<_> = prefixes.iter().collect();
        assert_eq!(prefixes.len(), unique.len(), "Duplicate ID prefixes found!");
    }

    proptest! {
        #[test]
        fn prop_any_ulid_roundtrips(raw in any::<u128>()) {
            let id = StudentId::parse(&format!("stu_{}", crate::Ulid::from(raw))).unwrap();
            let reparsed: StudentId = id.to_string().parse().unwrap();
            prop_assert_eq!(id, reparsed);
        }
    }
}
