//! SQLite Bookmark Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{BookmarkRecord, BookmarkRepositoryPort, RepositoryError};

/// SQLite Bookmark Repository
pub struct SqliteBookmarkRepository {
    pool: DbPool,
}

impl SqliteBookmarkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BookmarkRow {
    id: String,
    user_id: i64,
    novel_id: String,
    last_read_chapter_id: Option<String>,
    in_library: i64,
    updated_at: String,
}

impl TryFrom<BookmarkRow> for BookmarkRecord {
    type Error = RepositoryError;

    fn try_from(row: BookmarkRow) -> Result<Self, Self::Error> {
        Ok(BookmarkRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            user_id: row.user_id,
            novel_id: Uuid::parse_str(&row.novel_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            last_read_chapter_id: row
                .last_read_chapter_id
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            in_library: row.in_library != 0,
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl BookmarkRepositoryPort for SqliteBookmarkRepository {
    async fn upsert(&self, bookmark: &BookmarkRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO bookmarks (id, user_id, novel_id, last_read_chapter_id, in_library, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, novel_id) DO UPDATE SET
                last_read_chapter_id = excluded.last_read_chapter_id,
                in_library = excluded.in_library,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(bookmark.id.to_string())
        .bind(bookmark.user_id)
        .bind(bookmark.novel_id.to_string())
        .bind(bookmark.last_read_chapter_id.map(|id| id.to_string()))
        .bind(bookmark.in_library as i64)
        .bind(bookmark.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<BookmarkRecord>, RepositoryError> {
        let rows: Vec<BookmarkRow> = sqlx::query_as(
            "SELECT id, user_id, novel_id, last_read_chapter_id, in_library, updated_at FROM bookmarks WHERE user_id = ? ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(BookmarkRecord::try_from).collect()
    }
}
