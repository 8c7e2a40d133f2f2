//! Database error types.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to connect to the database.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Failed to execute a query.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// Migration directory not found in the current environment.
    #[error("migration directory not found; tried {tried}. Last error: {last_error}. Run from repo root or services/exam-api.")]
    MigrationDirNotFound { tried: String, last_error: String },

    /// A unique constraint rejected the write (duplicate code, usn, or seat).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(#[source] sqlx::Error),

    /// The exam already has a persisted seat plan.
    #[error("exam {exam_id} already has seat assignments")]
    AlreadyAllocated { exam_id: String },
}

impl DbError {
    /// Wraps a query error, classifying Postgres unique violations so callers
    /// can map them to conflict responses instead of server errors.
    pub fn from_query(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23505") {
                return DbError::UniqueViolation(e);
            }
        }
        DbError::Query(e)
    }

    /// True when the error is a unique-constraint conflict.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation(_))
    }
}
