//! Course catalog store.

use chrono::{DateTime, Utc};
use examplan_id::CourseId;
use sqlx::{postgres::PgRow, PgPool, QueryBuilder, Row};

use super::DbError;

/// A row from the courses table.
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub branch: String,
    pub semester: i16,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for CourseRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self {
            id: CourseId::parse(&id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "id".to_string(),
                source: Box::new(e),
            })?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            branch: row.try_get("branch")?,
            semester: row.try_get("semester")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for creating a course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    pub branch: String,
    pub semester: i16,
}

/// Store for course rows.
#[derive(Clone)]
pub struct CourseStore {
    pool: PgPool,
}

impl CourseStore {
    /// Create a new course store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a course and return the stored row.
    pub async fn create(&self, new: NewCourse) -> Result<CourseRecord, DbError> {
        let id = CourseId::new();
        sqlx::query_as::<_, CourseRecord>(
            r#"
            INSERT INTO courses (id, name, code, branch, semester)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, code, branch, semester, created_at
            "#,
        )
        .bind(id.to_string())
        .bind(&new.name)
        .bind(&new.code)
        .bind(&new.branch)
        .bind(new.semester)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_query)
    }

    /// List courses, optionally filtered by branch and semester, ordered by
    /// (branch, semester, code).
    pub async fn list(
        &self,
        branch: Option<&str>,
        semester: Option<i16>,
    ) -> Result<Vec<CourseRecord>, DbError> {
        let mut qb = QueryBuilder::<sqlx::Postgres>::new(
            "SELECT id, name, code, branch, semester, created_at FROM courses WHERE TRUE",
        );
        if let Some(branch) = branch {
            qb.push(" AND branch = ").push_bind(branch);
        }
        if let Some(semester) = semester {
            qb.push(" AND semester = ").push_bind(semester);
        }
        qb.push(" ORDER BY branch, semester, code");

        qb.build_query_as::<CourseRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)
    }

    /// Fetch one course by ID.
    pub async fn find(&self, id: &CourseId) -> Result<Option<CourseRecord>, DbError> {
        sqlx::query_as::<_, CourseRecord>(
            "SELECT id, name, code, branch, semester, created_at FROM courses WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}
