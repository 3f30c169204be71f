//! SQLite Novel Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::path::PathBuf;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    NovelFilter, NovelRecord, NovelRepositoryPort, NovelStatus, NovelSummary, RepositoryError,
};

/// SQLite Novel Repository
pub struct SqliteNovelRepository {
    pool: DbPool,
}

impl SqliteNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct NovelRow {
    id: String,
    title: String,
    author: String,
    alternative_title: Option<String>,
    synopsis: Option<String>,
    genre: String,
    status: String,
    cover_path: Option<String>,
    source_path: Option<String>,
    views: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<NovelRow> for NovelRecord {
    type Error = RepositoryError;

    fn try_from(row: NovelRow) -> Result<Self, Self::Error> {
        Ok(NovelRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            author: row.author,
            alternative_title: row.alternative_title,
            synopsis: row.synopsis,
            genre: row.genre,
            status: NovelStatus::from_str(&row.status).unwrap_or_default(),
            cover_path: row.cover_path.map(PathBuf::from),
            source_path: row.source_path.map(PathBuf::from),
            views: row.views,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(FromRow)]
struct NovelSummaryRow {
    id: String,
    title: String,
    author: String,
    genre: String,
    status: String,
    cover_path: Option<String>,
    rating: Option<f64>,
    chapter_count: i64,
    created_at: String,
}

impl TryFrom<NovelSummaryRow> for NovelSummary {
    type Error = RepositoryError;

    fn try_from(row: NovelSummaryRow) -> Result<Self, Self::Error> {
        Ok(NovelSummary {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            author: row.author,
            genre: row.genre,
            status: NovelStatus::from_str(&row.status).unwrap_or_default(),
            cover_path: row.cover_path.map(PathBuf::from),
            rating: row.rating.map(|r| (r * 10.0).round() / 10.0).unwrap_or(0.0),
            chapter_count: row.chapter_count,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

/// 构建列表查询的 WHERE 子句与绑定值
fn build_filter_clause(filter: &NovelFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(query) = &filter.query {
        conditions.push("(n.title LIKE ? COLLATE NOCASE OR n.author LIKE ? COLLATE NOCASE)");
        let pattern = format!("%{}%", query);
        binds.push(pattern.clone());
        binds.push(pattern);
    }
    if let Some(genre) = &filter.genre {
        conditions.push("n.genre = ? COLLATE NOCASE");
        binds.push(genre.clone());
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    (clause, binds)
}

#[async_trait]
impl NovelRepositoryPort for SqliteNovelRepository {
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO novels (id, title, author, alternative_title, synopsis, genre, status,
                                cover_path, source_path, views, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                author = excluded.author,
                alternative_title = excluded.alternative_title,
                synopsis = excluded.synopsis,
                genre = excluded.genre,
                status = excluded.status,
                cover_path = excluded.cover_path,
                source_path = excluded.source_path,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(novel.id.to_string())
        .bind(&novel.title)
        .bind(&novel.author)
        .bind(&novel.alternative_title)
        .bind(&novel.synopsis)
        .bind(&novel.genre)
        .bind(novel.status.as_str())
        .bind(
            novel
                .cover_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        )
        .bind(
            novel
                .source_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        )
        .bind(novel.views)
        .bind(novel.created_at.to_rfc3339())
        .bind(novel.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> = sqlx::query_as(
            "SELECT id, title, author, alternative_title, synopsis, genre, status, cover_path, source_path, views, created_at, updated_at FROM novels WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        filter: &NovelFilter,
    ) -> Result<(Vec<NovelSummary>, usize), RepositoryError> {
        let (clause, binds) = build_filter_clause(filter);

        let count_sql = format!("SELECT COUNT(*) FROM novels n{}", clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let page_sql = format!(
            r#"
            SELECT n.id, n.title, n.author, n.genre, n.status, n.cover_path,
                   (SELECT AVG(v.score) FROM novel_votes v WHERE v.novel_id = n.id) AS rating,
                   (SELECT COUNT(*) FROM chapters c WHERE c.novel_id = n.id) AS chapter_count,
                   n.created_at
            FROM novels n{}
            ORDER BY n.created_at DESC
            LIMIT ? OFFSET ?
            "#,
            clause
        );
        let mut page_query = sqlx::query_as::<_, NovelSummaryRow>(&page_sql);
        for bind in &binds {
            page_query = page_query.bind(bind);
        }
        let rows = page_query
            .bind(filter.limit as i64)
            .bind(filter.offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let novels = rows
            .into_iter()
            .map(NovelSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((novels, total as usize))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保原子性；comments 经由 chapters 级联
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query(
            "DELETE FROM comments WHERE chapter_id IN (SELECT id FROM chapters WHERE novel_id = ?)",
        )
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM chapters WHERE novel_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM novel_votes WHERE novel_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM bookmarks WHERE novel_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM novels WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE novels SET views = views + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig};
    use super::*;

    async fn setup() -> SqliteNovelRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteNovelRepository::new(pool)
    }

    fn make_novel(title: &str, author: &str, genre: &str) -> NovelRecord {
        let now = Utc::now();
        NovelRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.to_string(),
            alternative_title: None,
            synopsis: None,
            genre: genre.to_string(),
            status: NovelStatus::Ongoing,
            cover_path: None,
            source_path: None,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_find_roundtrip() {
        let repo = setup().await;
        let novel = make_novel("Sword of Dawn", "Ayn", "Fantasy");
        repo.save(&novel).await.unwrap();

        let found = repo.find_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Sword of Dawn");
        assert_eq!(found.author, "Ayn");
        assert_eq!(found.genre, "Fantasy");
        assert_eq!(found.views, 0);
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let repo = setup().await;
        let mut novel = make_novel("First", "A", "");
        repo.save(&novel).await.unwrap();

        novel.title = "Second".to_string();
        repo.save(&novel).await.unwrap();

        let found = repo.find_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Second");
    }

    #[tokio::test]
    async fn test_find_page_search_matches_title_and_author() {
        let repo = setup().await;
        repo.save(&make_novel("Dragon Road", "Smith", "Fantasy"))
            .await
            .unwrap();
        repo.save(&make_novel("Quiet Days", "Dragoner", "Romance"))
            .await
            .unwrap();
        repo.save(&make_novel("Quiet Nights", "Jones", "Romance"))
            .await
            .unwrap();

        let filter = NovelFilter {
            query: Some("dragon".to_string()),
            genre: None,
            offset: 0,
            limit: 12,
        };
        let (rows, total) = repo.find_page(&filter).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_find_page_genre_filter_case_insensitive() {
        let repo = setup().await;
        repo.save(&make_novel("A", "X", "Fantasy")).await.unwrap();
        repo.save(&make_novel("B", "Y", "Romance")).await.unwrap();

        let filter = NovelFilter {
            query: None,
            genre: Some("fantasy".to_string()),
            offset: 0,
            limit: 12,
        };
        let (rows, total) = repo.find_page(&filter).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].title, "A");
    }

    #[tokio::test]
    async fn test_find_page_offset_beyond_total_is_empty() {
        let repo = setup().await;
        repo.save(&make_novel("A", "X", "")).await.unwrap();

        let filter = NovelFilter {
            query: None,
            genre: None,
            offset: 100,
            limit: 12,
        };
        let (rows, total) = repo.find_page(&filter).await.unwrap();
        assert_eq!(total, 1);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_increment_views() {
        let repo = setup().await;
        let novel = make_novel("A", "X", "");
        repo.save(&novel).await.unwrap();

        repo.increment_views(novel.id).await.unwrap();
        repo.increment_views(novel.id).await.unwrap();

        let found = repo.find_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(found.views, 2);
    }

    #[tokio::test]
    async fn test_delete_removes_novel() {
        let repo = setup().await;
        let novel = make_novel("A", "X", "");
        repo.save(&novel).await.unwrap();

        repo.delete(novel.id).await.unwrap();
        assert!(repo.find_by_id(novel.id).await.unwrap().is_none());
    }
}
