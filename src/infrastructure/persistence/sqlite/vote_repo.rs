//! SQLite Vote Repository

use async_trait::async_trait;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{RepositoryError, VoteRecord, VoteRepositoryPort};

/// SQLite Vote Repository
pub struct SqliteVoteRepository {
    pool: DbPool,
}

impl SqliteVoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepositoryPort for SqliteVoteRepository {
    async fn upsert(&self, vote: &VoteRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO novel_votes (id, novel_id, user_id, score, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(novel_id, user_id) DO UPDATE SET
                score = excluded.score,
                created_at = excluded.created_at
            "#,
        )
        .bind(vote.id.to_string())
        .bind(vote.novel_id.to_string())
        .bind(vote.user_id)
        .bind(vote.score)
        .bind(vote.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn average_for_novel(&self, novel_id: Uuid) -> Result<Option<f64>, RepositoryError> {
        let avg: Option<f64> =
            sqlx::query_scalar("SELECT AVG(score) FROM novel_votes WHERE novel_id = ?")
                .bind(novel_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(avg)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig, SqliteNovelRepository};
    use super::*;
    use crate::application::ports::{NovelRecord, NovelRepositoryPort, NovelStatus};
    use chrono::Utc;

    async fn setup() -> (SqliteVoteRepository, Uuid) {
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

        (SqliteVoteRepository::new(pool), novel.id)
    }

    fn make_vote(novel_id: Uuid, user_id: i64, score: i64) -> VoteRecord {
        VoteRecord {
            id: Uuid::new_v4(),
            novel_id,
            user_id,
            score,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_average_without_votes_is_none() {
        let (repo, novel_id) = setup().await;
        assert_eq!(repo.average_for_novel(novel_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_average_over_votes() {
        let (repo, novel_id) = setup().await;
        repo.upsert(&make_vote(novel_id, 1, 4)).await.unwrap();
        repo.upsert(&make_vote(novel_id, 2, 5)).await.unwrap();

        let avg = repo.average_for_novel(novel_id).await.unwrap().unwrap();
        assert!((avg - 4.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_revote_replaces_score() {
        let (repo, novel_id) = setup().await;
        repo.upsert(&make_vote(novel_id, 1, 2)).await.unwrap();
        repo.upsert(&make_vote(novel_id, 1, 5)).await.unwrap();

        let avg = repo.average_for_novel(novel_id).await.unwrap().unwrap();
        assert!((avg - 5.0).abs() < f64::EPSILON);
    }
}
