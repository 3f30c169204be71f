//! SQLite Chapter Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    ChapterNeighbors, ChapterRecord, ChapterRepositoryPort, ChapterSummary, RepositoryError,
};

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    novel_id: String,
    title: String,
    body: String,
    order_key: i64,
    source_index: Option<f64>,
    created_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            novel_id: Uuid::parse_str(&row.novel_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            body: row.body,
            order_key: row.order_key,
            source_index: row.source_index,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(FromRow)]
struct ChapterSummaryRow {
    id: String,
    title: String,
    order_key: i64,
    created_at: String,
}

impl TryFrom<ChapterSummaryRow> for ChapterSummary {
    type Error = RepositoryError;

    fn try_from(row: ChapterSummaryRow) -> Result<Self, Self::Error> {
        Ok(ChapterSummary {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            order_key: row.order_key,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn replace_all(
        &self,
        novel_id: Uuid,
        chapters: &[ChapterRecord],
    ) -> Result<(), RepositoryError> {
        // 删旧插新在同一个事务里，生成失败不会留下半套章节
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query(
            "DELETE FROM comments WHERE chapter_id IN (SELECT id FROM chapters WHERE novel_id = ?)",
        )
        .bind(novel_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM chapters WHERE novel_id = ?")
            .bind(novel_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for chapter in chapters {
            sqlx::query(
                r#"
                INSERT INTO chapters (id, novel_id, title, body, order_key, source_index, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(chapter.id.to_string())
            .bind(chapter.novel_id.to_string())
            .bind(&chapter.title)
            .bind(&chapter.body)
            .bind(chapter.order_key)
            .bind(chapter.source_index)
            .bind(chapter.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(
            "SELECT id, novel_id, title, body, order_key, source_index, created_at FROM chapters WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn list_by_novel(
        &self,
        novel_id: Uuid,
    ) -> Result<Vec<ChapterSummary>, RepositoryError> {
        let rows: Vec<ChapterSummaryRow> = sqlx::query_as(
            "SELECT id, title, order_key, created_at FROM chapters WHERE novel_id = ? ORDER BY order_key",
        )
        .bind(novel_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ChapterSummary::try_from).collect()
    }

    async fn count_by_novel(&self, novel_id: Uuid) -> Result<usize, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE novel_id = ?")
            .bind(novel_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(count as usize)
    }

    async fn neighbors(
        &self,
        novel_id: Uuid,
        order_key: i64,
    ) -> Result<ChapterNeighbors, RepositoryError> {
        let prev: Option<String> = sqlx::query_scalar(
            "SELECT id FROM chapters WHERE novel_id = ? AND order_key < ? ORDER BY order_key DESC LIMIT 1",
        )
        .bind(novel_id.to_string())
        .bind(order_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let next: Option<String> = sqlx::query_scalar(
            "SELECT id FROM chapters WHERE novel_id = ? AND order_key > ? ORDER BY order_key ASC LIMIT 1",
        )
        .bind(novel_id.to_string())
        .bind(order_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(ChapterNeighbors {
            prev_id: prev
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            next_id: next
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig, SqliteNovelRepository};
    use super::*;
    use crate::application::ports::{NovelRecord, NovelRepositoryPort, NovelStatus};

    async fn setup() -> (SqliteChapterRepository, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let novel_repo = SqliteNovelRepository::new(pool.clone());
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
        novel_repo.save(&novel).await.unwrap();

        (SqliteChapterRepository::new(pool), novel.id)
    }

    fn make_chapter(novel_id: Uuid, order_key: i64, title: &str) -> ChapterRecord {
        ChapterRecord {
            id: Uuid::new_v4(),
            novel_id,
            title: title.to_string(),
            body: format!("<p>body {order_key}</p>"),
            order_key,
            source_index: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_replace_all_and_list_in_order() {
        let (repo, novel_id) = setup().await;
        let chapters = vec![
            make_chapter(novel_id, 1, "One"),
            make_chapter(novel_id, 2, "Two"),
            make_chapter(novel_id, 3, "Three"),
        ];
        repo.replace_all(novel_id, &chapters).await.unwrap();

        let listed = repo.list_by_novel(novel_id).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(repo.count_by_novel(novel_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_replace_all_discards_previous_set() {
        let (repo, novel_id) = setup().await;
        repo.replace_all(novel_id, &[make_chapter(novel_id, 1, "Old")])
            .await
            .unwrap();
        repo.replace_all(
            novel_id,
            &[
                make_chapter(novel_id, 1, "New 1"),
                make_chapter(novel_id, 2, "New 2"),
            ],
        )
        .await
        .unwrap();

        let listed = repo.list_by_novel(novel_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "New 1");
    }

    #[tokio::test]
    async fn test_replace_all_with_empty_set_clears() {
        let (repo, novel_id) = setup().await;
        repo.replace_all(novel_id, &[make_chapter(novel_id, 1, "Old")])
            .await
            .unwrap();
        repo.replace_all(novel_id, &[]).await.unwrap();

        assert_eq!(repo.count_by_novel(novel_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_neighbors_middle_chapter() {
        let (repo, novel_id) = setup().await;
        let chapters = vec![
            make_chapter(novel_id, 1, "One"),
            make_chapter(novel_id, 2, "Two"),
            make_chapter(novel_id, 3, "Three"),
        ];
        repo.replace_all(novel_id, &chapters).await.unwrap();

        let neighbors = repo.neighbors(novel_id, 2).await.unwrap();
        assert_eq!(neighbors.prev_id, Some(chapters[0].id));
        assert_eq!(neighbors.next_id, Some(chapters[2].id));
    }

    #[tokio::test]
    async fn test_neighbors_at_edges() {
        let (repo, novel_id) = setup().await;
        let chapters = vec![
            make_chapter(novel_id, 1, "One"),
            make_chapter(novel_id, 2, "Two"),
        ];
        repo.replace_all(novel_id, &chapters).await.unwrap();

        let first = repo.neighbors(novel_id, 1).await.unwrap();
        assert_eq!(first.prev_id, None);
        assert_eq!(first.next_id, Some(chapters[1].id));

        let last = repo.neighbors(novel_id, 2).await.unwrap();
        assert_eq!(last.prev_id, Some(chapters[0].id));
        assert_eq!(last.next_id, None);
    }
}
