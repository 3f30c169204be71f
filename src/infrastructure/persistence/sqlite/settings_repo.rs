//! SQLite Settings Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{RepositoryError, SettingsRecord, SettingsRepositoryPort};

/// SQLite Settings Repository
pub struct SqliteSettingsRepository {
    pool: DbPool,
}

impl SqliteSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SettingsRow {
    user_id: i64,
    font_size: i64,
    line_height: f64,
    theme: String,
}

impl From<SettingsRow> for SettingsRecord {
    fn from(row: SettingsRow) -> Self {
        SettingsRecord {
            user_id: row.user_id,
            font_size: row.font_size,
            line_height: row.line_height,
            theme: row.theme,
        }
    }
}

#[async_trait]
impl SettingsRepositoryPort for SqliteSettingsRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<SettingsRecord>, RepositoryError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            "SELECT user_id, font_size, line_height, theme FROM user_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(row.map(SettingsRecord::from))
    }

    async fn upsert(&self, settings: &SettingsRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, font_size, line_height, theme)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                font_size = excluded.font_size,
                line_height = excluded.line_height,
                theme = excluded.theme
            "#,
        )
        .bind(settings.user_id)
        .bind(settings.font_size)
        .bind(settings.line_height)
        .bind(&settings.theme)
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

    async fn setup() -> SqliteSettingsRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteSettingsRepository::new(pool)
    }

    #[tokio::test]
    async fn test_find_missing_user_is_none() {
        let repo = setup().await;
        assert!(repo.find_by_user(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_find() {
        let repo = setup().await;
        let settings = SettingsRecord {
            user_id: 42,
            font_size: 20,
            line_height: 2.0,
            theme: "light".to_string(),
        };
        repo.upsert(&settings).await.unwrap();

        let found = repo.find_by_user(42).await.unwrap().unwrap();
        assert_eq!(found.font_size, 20);
        assert_eq!(found.theme, "light");

        repo.upsert(&SettingsRecord {
            font_size: 24,
            ..settings
        })
        .await
        .unwrap();
        let found = repo.find_by_user(42).await.unwrap().unwrap();
        assert_eq!(found.font_size, 24);
    }
}
