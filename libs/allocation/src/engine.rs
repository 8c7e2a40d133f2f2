//! The single-pass seat allocation algorithm.

use std::collections::{BTreeMap, BTreeSet};

use examplan_id::RoomId;

use crate::error::AllocationError;
use crate::model::{ExamContext, Notification, Room, SeatAssignment, Student};

/// The complete output of a successful allocation run.
///
/// `assignments` and `notifications` are index-aligned: entry `i` of both
/// refers to the `i`-th student of the input roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatPlan {
    /// One seat per roster student, in roster order.
    pub assignments: Vec<SeatAssignment>,

    /// One message per roster student, in roster order.
    pub notifications: Vec<Notification>,
}

impl SeatPlan {
    /// Number of distinct rooms the plan actually uses.
    #[must_use]
    pub fn rooms_used(&self) -> usize {
        self.assignments
            .iter()
            .map(|a| a.room_id)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Bookkeeping for one room during the run: which branches sit in it and the
/// next free seat. Created when the cursor first touches the room, discarded
/// with the run.
#[derive(Debug)]
struct RoomOccupancy {
    branches: BTreeSet<String>,
    next_seat: u32,
}

impl RoomOccupancy {
    fn new() -> Self {
        Self {
            branches: BTreeSet::new(),
            next_seat: 1,
        }
    }

    /// Whether seating `branch` here keeps the room at two distinct branches
    /// or fewer.
    fn admits(&self, branch: &str) -> bool {
        self.branches.contains(branch) || self.branches.len() < 2
    }
}

/// Assigns every roster student a `(room, seat)` pair.
///
/// `roster` must be the ordered student list for the exam's semester
/// (branch, then registration number); `rooms` must be sorted by descending
/// capacity. Rooms are consumed strictly in that order: a room is never
/// skipped, reordered, or revisited once the cursor moves past it, and
/// students are seated strictly in roster order.
///
/// Two events move the cursor to the next room:
///
/// - a student would bring a third distinct branch into the current room, in
///   which case that student takes seat 1 of the *next* room; or
/// - the current room is full after a placement.
///
/// Running out of rooms on the first path fails with
/// [`AllocationError::InsufficientRoomsForBranchMix`]; on the second, with
/// [`AllocationError::InsufficientCapacity`] if students remain unseated.
/// Failure is all-or-nothing: no partial plan is ever returned.
pub fn allocate(
    ctx: &ExamContext,
    roster: &[Student],
    rooms: &[Room],
) -> Result<SeatPlan, AllocationError> {
    if roster.is_empty() {
        return Err(AllocationError::EmptyRoster);
    }
    if rooms.is_empty() {
        return Err(AllocationError::NoRoomsAvailable);
    }
    if let Some(bad) = rooms.iter().find(|r| r.capacity == 0) {
        return Err(AllocationError::InvalidRoomConfiguration {
            room_id: bad.id,
            capacity: bad.capacity,
        });
    }

    let mut occupancy: BTreeMap<RoomId, RoomOccupancy> = BTreeMap::new();
    let mut room_index = 0;
    let mut assignments = Vec::with_capacity(roster.len());
    let mut notifications = Vec::with_capacity(roster.len());

    for (placed, student) in roster.iter().enumerate() {
        // Invariant: room_index < rooms.len() here. Both advance paths below
        // fail the run before the next iteration would read past the end.
        let admits = match occupancy.get(&rooms[room_index].id) {
            Some(occ) => occ.admits(&student.branch),
            None => true,
        };
        if !admits {
            room_index += 1;
            if room_index >= rooms.len() {
                return Err(AllocationError::InsufficientRoomsForBranchMix);
            }
        }

        let room = &rooms[room_index];
        let occ = occupancy.entry(room.id).or_insert_with(RoomOccupancy::new);
        occ.branches.insert(student.branch.clone());

        assignments.push(SeatAssignment {
            exam_id: ctx.exam_id,
            room_id: room.id,
            seat_number: occ.next_seat,
            student_id: student.id,
        });
        notifications.push(Notification {
            student_id: student.id,
            message: format!(
                "Seat assigned for {}: Room {}, Seat {}",
                ctx.course_name, room.name, occ.next_seat
            ),
        });

        occ.next_seat += 1;
        if occ.next_seat > room.capacity {
            room_index += 1;
            if room_index >= rooms.len() && placed + 1 < roster.len() {
                return Err(AllocationError::InsufficientCapacity);
            }
        }
    }

    Ok(SeatPlan {
        assignments,
        notifications,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use examplan_id::{ExamId, StudentId};
    use rstest::rstest;

    fn ctx() -> ExamContext {
        ExamContext {
            exam_id: ExamId::new(),
            course_name: "Data Structures".to_string(),
        }
    }

    fn student(branch: &str, usn: &str) -> Student {
        Student {
            id: StudentId::new(),
            name: format!("Student {usn}"),
            usn: usn.to_string(),
            branch: branch.to_string(),
            semester: 3,
        }
    }

    fn room(name: &str, capacity: u32) -> Room {
        Room {
            id: RoomId::new(),
            name: name.to_string(),
            capacity,
        }
    }

    #[test]
    fn test_empty_roster_fails() {
        let result = allocate(&ctx(), &[], &[room("R1", 10)]);
        assert_eq!(result.unwrap_err(), AllocationError::EmptyRoster);
    }

    #[test]
    fn test_no_rooms_fails() {
        let roster = vec![student("CSE", "1X20CS001")];
        let result = allocate(&ctx(), &roster, &[]);
        assert_eq!(result.unwrap_err(), AllocationError::NoRoomsAvailable);
    }

    #[test]
    fn test_zero_capacity_room_rejected_before_the_pass() {
        let roster = vec![student("CSE", "1X20CS001")];
        let rooms = vec![room("R1", 5), room("R2", 0)];
        let result = allocate(&ctx(), &roster, &rooms);
        assert!(matches!(
            result.unwrap_err(),
            AllocationError::InvalidRoomConfiguration { capacity: 0, .. }
        ));
    }

    #[test]
    fn test_three_students_one_two_seat_room_overflows() {
        let roster = vec![
            student("CSE", "1X20CS001"),
            student("CSE", "1X20CS002"),
            student("ECE", "1X20EC001"),
        ];
        let rooms = vec![room("R1", 2)];
        let result = allocate(&ctx(), &roster, &rooms);
        assert_eq!(result.unwrap_err(), AllocationError::InsufficientCapacity);
    }

    #[test]
    fn test_third_branch_with_single_room_fails_branch_mix() {
        let roster = vec![
            student("CSE", "1X20CS001"),
            student("ECE", "1X20EC001"),
            student("ME", "1X20ME001"),
        ];
        let rooms = vec![room("R1", 10)];
        let result = allocate(&ctx(), &roster, &rooms);
        assert_eq!(
            result.unwrap_err(),
            AllocationError::InsufficientRoomsForBranchMix
        );
    }

    #[test]
    fn test_two_branches_two_rooms_fill_in_order() {
        let roster = vec![
            student("CSE", "1X20CS001"),
            student("CSE", "1X20CS002"),
            student("ECE", "1X20EC001"),
            student("ECE", "1X20EC002"),
        ];
        let rooms = vec![room("R1", 2), room("R2", 2)];

        let plan = allocate(&ctx(), &roster, &rooms).unwrap();

        assert_eq!(plan.assignments.len(), 4);
        assert_eq!(plan.notifications.len(), 4);
        assert_eq!(plan.rooms_used(), 2);

        let expected = [
            (rooms[0].id, 1),
            (rooms[0].id, 2),
            (rooms[1].id, 1),
            (rooms[1].id, 2),
        ];
        for (assignment, (room_id, seat)) in plan.assignments.iter().zip(expected) {
            assert_eq!(assignment.room_id, room_id);
            assert_eq!(assignment.seat_number, seat);
        }
    }

    #[test]
    fn test_notification_names_course_room_and_seat() {
        let ctx = ExamContext {
            exam_id: ExamId::new(),
            course_name: "Operating Systems".to_string(),
        };
        let roster = vec![student("CSE", "1X20CS001")];
        let rooms = vec![room("LH-204", 30)];

        let plan = allocate(&ctx, &roster, &rooms).unwrap();

        assert_eq!(plan.notifications[0].student_id, roster[0].id);
        assert_eq!(
            plan.notifications[0].message,
            "Seat assigned for Operating Systems: Room LH-204, Seat 1"
        );
    }

    #[test]
    fn test_third_branch_opens_next_room_and_seats_trigger_student_there() {
        let roster = vec![
            student("CSE", "1X20CS001"),
            student("CSE", "1X20CS002"),
            student("ECE", "1X20EC001"),
            student("ME", "1X20ME001"),
        ];
        let rooms = vec![room("R1", 10), room("R2", 10)];

        let plan = allocate(&ctx(), &roster, &rooms).unwrap();

        // The ME student triggers the overflow and lands in R2 at seat 1,
        // not in the room whose branch set it overflowed.
        let trigger = &plan.assignments[3];
        assert_eq!(trigger.room_id, rooms[1].id);
        assert_eq!(trigger.seat_number, 1);

        // R1 keeps its first three students on contiguous seats.
        let r1_seats: Vec<u32> = plan
            .assignments
            .iter()
            .filter(|a| a.room_id == rooms[0].id)
            .map(|a| a.seat_number)
            .collect();
        assert_eq!(r1_seats, vec![1, 2, 3]);
    }

    #[test]
    fn test_full_room_advances_and_seat_counter_restarts() {
        let roster = vec![
            student("CSE", "1X20CS001"),
            student("CSE", "1X20CS002"),
            student("CSE", "1X20CS003"),
        ];
        let rooms = vec![room("R1", 2), room("R2", 5)];

        let plan = allocate(&ctx(), &roster, &rooms).unwrap();

        assert_eq!(plan.assignments[2].room_id, rooms[1].id);
        assert_eq!(plan.assignments[2].seat_number, 1);
    }

    #[test]
    fn test_exact_fit_in_last_room_succeeds() {
        let roster = vec![
            student("CSE", "1X20CS001"),
            student("CSE", "1X20CS002"),
        ];
        let rooms = vec![room("R1", 2)];

        let plan = allocate(&ctx(), &roster, &rooms).unwrap();
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.rooms_used(), 1);
    }

    #[test]
    fn test_same_inputs_produce_identical_plans() {
        let roster = vec![
            student("CSE", "1X20CS001"),
            student("ECE", "1X20EC001"),
            student("ECE", "1X20EC002"),
            student("ME", "1X20ME001"),
        ];
        let rooms = vec![room("R1", 3), room("R2", 3)];
        let ctx = ctx();

        let first = allocate(&ctx, &roster, &rooms).unwrap();
        let second = allocate(&ctx, &roster, &rooms).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case::one_seat_short(3, 1, AllocationError::InsufficientCapacity)]
    #[case::single_seat_room(2, 1, AllocationError::InsufficientCapacity)]
    fn test_capacity_shortfalls(
        #[case] students: usize,
        #[case] capacity: u32,
        #[case] expected: AllocationError,
    ) {
        let roster: Vec<Student> = (0..students)
            .map(|i| student("CSE", &format!("1X20CS{i:03}")))
            .collect();
        let rooms = vec![room("R1", capacity)];
        assert_eq!(allocate(&ctx(), &roster, &rooms).unwrap_err(), expected);
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use examplan_id::{ExamId, StudentId};
    use proptest::prelude::*;

    const BRANCHES: &[&str] = &["CSE", "ECE", "ME", "CIV"];

    fn arb_roster() -> impl Strategy<Value = Vec<Student>> {
        prop::collection::vec(prop::sample::select(BRANCHES), 1..60).prop_map(|mut branches| {
            // RosterSource hands the engine students ordered by (branch, usn).
            branches.sort_unstable();
            branches
                .into_iter()
                .enumerate()
                .map(|(i, branch)| Student {
                    id: StudentId::new(),
                    name: format!("Student {i}"),
                    usn: format!("1X20XX{i:03}"),
                    branch: branch.to_string(),
                    semester: 3,
                })
                .collect()
        })
    }

    fn arb_rooms() -> impl Strategy<Value = Vec<Room>> {
        prop::collection::vec(1u32..15, 1..6).prop_map(|mut caps| {
            caps.sort_unstable_by(|a, b| b.cmp(a));
            caps.into_iter()
                .enumerate()
                .map(|(i, capacity)| Room {
                    id: RoomId::new(),
                    name: format!("R{}", i + 1),
                    capacity,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_successful_plans_hold_all_invariants(
            roster in arb_roster(),
            rooms in arb_rooms(),
        ) {
            let ctx = ExamContext {
                exam_id: ExamId::new(),
                course_name: "Course".to_string(),
            };

            let Ok(plan) = allocate(&ctx, &roster, &rooms) else {
                // Failure purity: an Err carries no assignments at all.
                return Ok(());
            };

            let capacity_of: std::collections::BTreeMap<_, _> =
                rooms.iter().map(|r| (r.id, r.capacity)).collect();

            // Completeness: every roster student seated exactly once.
            prop_assert_eq!(plan.assignments.len(), roster.len());
            prop_assert_eq!(plan.notifications.len(), roster.len());
            let seated: std::collections::BTreeSet<_> =
                plan.assignments.iter().map(|a| a.student_id).collect();
            prop_assert_eq!(seated.len(), roster.len());

            let mut seats_by_room: std::collections::BTreeMap<_, Vec<u32>> = Default::default();
            let mut branches_by_room: std::collections::BTreeMap<_, std::collections::BTreeSet<&str>> =
                Default::default();
            let branch_of: std::collections::BTreeMap<_, _> =
                roster.iter().map(|s| (s.id, s.branch.as_str())).collect();

            for a in &plan.assignments {
                prop_assert_eq!(a.exam_id, ctx.exam_id);
                seats_by_room.entry(a.room_id).or_default().push(a.seat_number);
                branches_by_room
                    .entry(a.room_id)
                    .or_default()
                    .insert(branch_of[&a.student_id]);
            }

            for (room_id, mut seats) in seats_by_room {
                let capacity = capacity_of[&room_id];
                // Capacity invariant.
                prop_assert!(seats.len() as u32 <= capacity);
                // Seat uniqueness and contiguity from 1.
                seats.sort_unstable();
                let expected: Vec<u32> = (1..=seats.len() as u32).collect();
                prop_assert_eq!(seats, expected);
            }

            // Branch-mix invariant.
            for branches in branches_by_room.values() {
                prop_assert!(branches.len() <= 2);
            }
        }

        #[test]
        fn prop_allocation_is_deterministic(
            roster in arb_roster(),
            rooms in arb_rooms(),
        ) {
            let ctx = ExamContext {
                exam_id: ExamId::new(),
                course_name: "Course".to_string(),
            };
            prop_assert_eq!(allocate(&ctx, &roster, &rooms), allocate(&ctx, &roster, &rooms));
        }
    }
}
