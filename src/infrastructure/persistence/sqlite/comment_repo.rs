//! SQLite Comment Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{CommentRecord, CommentRepositoryPort, RepositoryError};

/// SQLite Comment Repository
pub struct SqliteCommentRepository {
    pool: DbPool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: String,
    chapter_id: String,
    user_id: i64,
    text: String,
    created_at: String,
}

impl TryFrom<CommentRow> for CommentRecord {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(CommentRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            chapter_id: Uuid::parse_str(&row.chapter_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            user_id: row.user_id,
            text: row.text,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl CommentRepositoryPort for SqliteCommentRepository {
    async fn create(&self, comment: &CommentRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, chapter_id, user_id, text, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.chapter_id.to_string())
        .bind(comment.user_id)
        .bind(&comment.text)
        .bind(comment.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn list_by_chapter(
        &self,
        chapter_id: Uuid,
    ) -> Result<Vec<CommentRecord>, RepositoryError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT id, chapter_id, user_id, text, created_at FROM comments WHERE chapter_id = ? ORDER BY created_at DESC",
        )
        .bind(chapter_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(CommentRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository,
        SqliteNovelRepository,
    };
    use super::*;
    use crate::application::ports::{
        ChapterRecord, ChapterRepositoryPort, NovelRecord, NovelRepositoryPort, NovelStatus,
    };

    async fn setup() -> (SqliteCommentRepository, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let now = Utc::now();
        let novel = NovelRecord {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            author: "A".to_string(),
            alternative_title: None,
            synopsis: None,
            genre: String::new(),
            status: NovelStatus::Ongoing,
            cover_path: None,
            source_path: None,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        SqliteNovelRepository::new(pool.clone())
            .save(&novel)
            .await
            .unwrap();

        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            novel_id: novel.id,
            title: "One".to_string(),
            body: "<p>x</p>".to_string(),
            order_key: 1,
            source_index: None,
            created_at: now,
        };
        SqliteChapterRepository::new(pool.clone())
            .replace_all(novel.id, std::slice::from_ref(&chapter))
            .await
            .unwrap();

        (SqliteCommentRepository::new(pool), chapter.id)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (repo, chapter_id) = setup().await;

        repo.create(&CommentRecord {
            id: Uuid::new_v4(),
            chapter_id,
            user_id: 1,
            text: "Great chapter".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

        let rows = repo.list_by_chapter(chapter_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Great chapter");
    }

    #[tokio::test]
    async fn test_list_unknown_chapter_is_empty() {
        let (repo, _) = setup().await;
        assert!(repo
            .list_by_chapter(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }
}
