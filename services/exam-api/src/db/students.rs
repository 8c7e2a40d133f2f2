//! Student roster store.

use chrono::{DateTime, Utc};
use examplan_id::StudentId;
use sqlx::{postgres::PgRow, PgPool, QueryBuilder, Row};

use super::DbError;

/// A row from the students table.
#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub usn: String,
    pub branch: String,
    pub semester: i16,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for StudentRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self {
            id: StudentId::parse(&id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "id".to_string(),
                source: Box::new(e),
            })?,
            name: row.try_get("name")?,
            usn: row.try_get("usn")?,
            branch: row.try_get("branch")?,
            semester: row.try_get("semester")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for one imported student row.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub usn: String,
    pub branch: String,
    pub semester: i16,
}

/// Semester parity filter for roster listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemesterParity {
    Odd,
    Even,
}

/// Store for student rows.
#[derive(Clone)]
pub struct StudentStore {
    pool: PgPool,
}

impl StudentStore {
    /// Create a new student store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List students with optional filters, ordered by
    /// (branch, semester, usn).
    pub async fn list(
        &self,
        branch: Option<&str>,
        semester: Option<i16>,
        parity: Option<SemesterParity>,
    ) -> Result<Vec<StudentRecord>, DbError> {
        let mut qb = QueryBuilder::<sqlx::Postgres>::new(
            "SELECT id, name, usn, branch, semester, created_at FROM students WHERE TRUE",
        );
        if let Some(branch) = branch {
            qb.push(" AND branch = ").push_bind(branch);
        }
        if let Some(semester) = semester {
            qb.push(" AND semester = ").push_bind(semester);
        }
        match parity {
            Some(SemesterParity::Odd) => {
                qb.push(" AND semester % 2 = 1");
            }
            Some(SemesterParity::Even) => {
                qb.push(" AND semester % 2 = 0");
            }
            None => {}
        }
        qb.push(" ORDER BY branch, semester, usn");

        qb.build_query_as::<StudentRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)
    }

    /// The ordered roster the allocation engine consumes: every student of
    /// one semester, by (branch, usn).
    pub async fn roster_for_semester(&self, semester: i16) -> Result<Vec<StudentRecord>, DbError> {
        sqlx::query_as::<_, StudentRecord>(
            r#"
            SELECT id, name, usn, branch, semester, created_at
            FROM students
            WHERE semester = $1
            ORDER BY branch, usn
            "#,
        )
        .bind(semester)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Insert one imported student. Returns `false` when the row was skipped
    /// because the registration number already exists.
    pub async fn insert_if_new(&self, new: &NewStudent) -> Result<bool, DbError> {
        let id = StudentId::new();
        let result = sqlx::query(
            r#"
            INSERT INTO students (id, name, usn, branch, semester)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (usn) DO NOTHING
            "#,
        )
        .bind(id.to_string())
        .bind(&new.name)
        .bind(&new.usn)
        .bind(&new.branch)
        .bind(new.semester)
        .execute(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(result.rows_affected() == 1)
    }
}
