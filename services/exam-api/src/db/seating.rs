//! Seat plan persistence and reporting.
//!
//! This store is the engine's AssignmentSink: a computed seat plan is
//! written — assignments and notifications together — in a single
//! transaction, so a failed write never leaves an exam with a partial
//! seating plan.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use examplan_id::{ExamId, NotificationId, SeatAssignmentId, StudentId};
use examplan_allocation::SeatPlan;
use sqlx::{postgres::PgRow, PgPool, Row};

use super::DbError;

/// One row of the seat-plan report: an assignment joined with student, room,
/// exam, and course metadata.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SeatPlanRow {
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

impl<'r> sqlx::FromRow<'r, PgRow> for SeatPlanRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            student_name: row.try_get("student_name")?,
            usn: row.try_get("usn")?,
            branch: row.try_get("branch")?,
            semester: row.try_get("semester")?,
            course_name: row.try_get("course_name")?,
            exam_date: row.try_get("exam_date")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            room_name: row.try_get("room_name")?,
            seat_number: row.try_get("seat_number")?,
        })
    }
}

/// A seat as seen by the student who holds it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StudentSeat {
    pub seat_number: i32,
    pub room_name: String,
    pub course_name: String,
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl<'r> sqlx::FromRow<'r, PgRow> for StudentSeat {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            seat_number: row.try_get("seat_number")?,
            room_name: row.try_get("room_name")?,
            course_name: row.try_get("course_name")?,
            exam_date: row.try_get("exam_date")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
        })
    }
}

/// A row from the notifications table.
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub student_id: StudentId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for NotificationRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let student_id: String = row.try_get("student_id")?;
        Ok(Self {
            id: NotificationId::parse(&id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "id".to_string(),
                source: Box::new(e),
            })?,
            student_id: StudentId::parse(&student_id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "student_id".to_string(),
                source: Box::new(e),
            })?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Store for seat assignments and notifications.
#[derive(Clone)]
pub struct SeatingStore {
    pool: PgPool,
}

impl SeatingStore {
    /// Create a new seating store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the exam already has a persisted seat plan.
    pub async fn has_assignments(&self, exam_id: &ExamId) -> Result<bool, DbError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM seat_assignments WHERE exam_id = $1")
                .bind(exam_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::Query)?;
        Ok(count > 0)
    }

    /// Persist a complete seat plan as one atomic unit.
    ///
    /// Every assignment and every notification is written inside a single
    /// transaction; any failure rolls the whole plan back. A concurrent run
    /// for the same exam trips the `(exam_id, student_id)` unique constraint
    /// and surfaces as [`DbError::AlreadyAllocated`].
    pub async fn persist_plan(&self, exam_id: &ExamId, plan: &SeatPlan) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        for assignment in &plan.assignments {
            let id = SeatAssignmentId::new();
            sqlx::query(
                r#"
                INSERT INTO seat_assignments (id, exam_id, room_id, seat_number, student_id)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(id.to_string())
            .bind(assignment.exam_id.to_string())
            .bind(assignment.room_id.to_string())
            .bind(assignment.seat_number as i32)
            .bind(assignment.student_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from_query(e) {
                err if err.is_unique_violation() => DbError::AlreadyAllocated {
                    exam_id: exam_id.to_string(),
                },
                err => err,
            })?;
        }

        for notification in &plan.notifications {
            let id = NotificationId::new();
            sqlx::query(
                r#"
                INSERT INTO notifications (id, student_id, message)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id.to_string())
            .bind(notification.student_id.to_string())
            .bind(&notification.message)
            .execute(&mut *tx)
            .await
            .map_err(DbError::Query)?;
        }

        tx.commit().await.map_err(DbError::Query)
    }

    /// The seat-plan report join: one row per assignment, ordered by room
    /// name then seat number.
    pub async fn seat_plan_rows(&self, exam_id: &ExamId) -> Result<Vec<SeatPlanRow>, DbError> {
        sqlx::query_as::<_, SeatPlanRow>(
            r#"
            SELECT s.name AS student_name, s.usn, s.branch, s.semester,
                   c.name AS course_name, e.exam_date, e.start_time, e.end_time,
                   r.name AS room_name, sa.seat_number
            FROM seat_assignments sa
            JOIN students s ON sa.student_id = s.id
            JOIN exams e ON sa.exam_id = e.id
            JOIN courses c ON e.course_id = c.id
            JOIN rooms r ON sa.room_id = r.id
            WHERE e.id = $1
            ORDER BY r.name, sa.seat_number
            "#,
        )
        .bind(exam_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// All seats held by one student, joined with room/exam/course metadata.
    pub async fn seats_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<StudentSeat>, DbError> {
        sqlx::query_as::<_, StudentSeat>(
            r#"
            SELECT sa.seat_number, r.name AS room_name, c.name AS course_name,
                   e.exam_date, e.start_time, e.end_time
            FROM seat_assignments sa
            JOIN rooms r ON sa.room_id = r.id
            JOIN exams e ON sa.exam_id = e.id
            JOIN courses c ON e.course_id = c.id
            WHERE sa.student_id = $1
            ORDER BY e.exam_date, e.start_time
            "#,
        )
        .bind(student_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Notifications for one student, newest first.
    pub async fn notifications_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<NotificationRecord>, DbError> {
        sqlx::query_as::<_, NotificationRecord>(
            r#"
            SELECT id, student_id, message, created_at
            FROM notifications
            WHERE student_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(student_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}
