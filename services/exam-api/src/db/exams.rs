//! Exam store.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use examplan_id::{CourseId, ExamId};
use sqlx::{postgres::PgRow, PgPool, Row};

use super::DbError;

/// A row from the exams table.
#[derive(Debug, Clone)]
pub struct ExamRecord {
    pub id: ExamId,
    pub course_id: CourseId,
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ExamRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let course_id: String = row.try_get("course_id")?;
        Ok(Self {
            id: ExamId::parse(&id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "id".to_string(),
                source: Box::new(e),
            })?,
            course_id: CourseId::parse(&course_id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "course_id".to_string(),
                source: Box::new(e),
            })?,
            exam_date: row.try_get("exam_date")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// An exam joined with the course it examines.
#[derive(Debug, Clone)]
pub struct ExamWithCourse {
    pub exam: ExamRecord,
    pub course_name: String,
    pub branch: String,
    pub semester: i16,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ExamWithCourse {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            exam: ExamRecord::from_row(row)?,
            course_name: row.try_get("course_name")?,
            branch: row.try_get("branch")?,
            semester: row.try_get("semester")?,
        })
    }
}

/// Input for scheduling an exam.
#[derive(Debug, Clone)]
pub struct NewExam {
    pub course_id: CourseId,
    pub exam_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Store for exam rows.
#[derive(Clone)]
pub struct ExamStore {
    pool: PgPool,
}

impl ExamStore {
    /// Create a new exam store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an exam and return the stored row.
    pub async fn create(&self, new: NewExam) -> Result<ExamRecord, DbError> {
        let id = ExamId::new();
        sqlx::query_as::<_, ExamRecord>(
            r#"
            INSERT INTO exams (id, course_id, exam_date, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, course_id, exam_date, start_time, end_time, created_at
            "#,
        )
        .bind(id.to_string())
        .bind(new.course_id.to_string())
        .bind(new.exam_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_query)
    }

    /// List exams joined with their courses, ordered by (exam_date, branch).
    pub async fn list_with_courses(&self) -> Result<Vec<ExamWithCourse>, DbError> {
        sqlx::query_as::<_, ExamWithCourse>(
            r#"
            SELECT e.id, e.course_id, e.exam_date, e.start_time, e.end_time, e.created_at,
                   c.name AS course_name, c.branch, c.semester
            FROM exams e
            JOIN courses c ON e.course_id = c.id
            ORDER BY e.exam_date, c.branch
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Fetch one exam joined with its course.
    pub async fn find_with_course(&self, id: &ExamId) -> Result<Option<ExamWithCourse>, DbError> {
        sqlx::query_as::<_, ExamWithCourse>(
            r#"
            SELECT e.id, e.course_id, e.exam_date, e.start_time, e.end_time, e.created_at,
                   c.name AS course_name, c.branch, c.semester
            FROM exams e
            JOIN courses c ON e.course_id = c.id
            WHERE e.id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}
