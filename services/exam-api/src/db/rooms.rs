//! Room store.

use chrono::{DateTime, Utc};
use examplan_id::RoomId;
use sqlx::{postgres::PgRow, PgPool, Row};

use super::DbError;

/// A row from the rooms table.
#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for RoomRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self {
            id: RoomId::parse(&id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "id".to_string(),
                source: Box::new(e),
            })?,
            name: row.try_get("name")?,
            capacity: row.try_get("capacity")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for creating a room.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub name: String,
    pub capacity: i32,
}

/// Store for room rows.
#[derive(Clone)]
pub struct RoomStore {
    pool: PgPool,
}

impl RoomStore {
    /// Create a new room store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a room and return the stored row.
    pub async fn create(&self, new: NewRoom) -> Result<RoomRecord, DbError> {
        let id = RoomId::new();
        sqlx::query_as::<_, RoomRecord>(
            r#"
            INSERT INTO rooms (id, name, capacity)
            VALUES ($1, $2, $3)
            RETURNING id, name, capacity, created_at
            "#,
        )
        .bind(id.to_string())
        .bind(&new.name)
        .bind(new.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_query)
    }

    /// List rooms ordered by descending capacity — the order the allocation
    /// engine consumes them in.
    pub async fn list_by_capacity_desc(&self) -> Result<Vec<RoomRecord>, DbError> {
        sqlx::query_as::<_, RoomRecord>(
            "SELECT id, name, capacity, created_at FROM rooms ORDER BY capacity DESC, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}
