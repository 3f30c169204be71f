//! Library Command Handlers - 书架、评论、阅读偏好

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateComment, SaveSettings, SetBookmark};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookmarkRecord, BookmarkRepositoryPort, ChapterRepositoryPort, CommentRecord,
    CommentRepositoryPort, NovelRepositoryPort, SettingsRecord, SettingsRepositoryPort,
};

// ============================================================================
// SetBookmark
// ============================================================================

/// SetBookmark Handler - 保存阅读进度与书架标记
pub struct SetBookmarkHandler {
    bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl SetBookmarkHandler {
    pub fn new(
        bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
        novel_repo: Arc<dyn NovelRepositoryPort>,
    ) -> Self {
        Self {
            bookmark_repo,
            novel_repo,
        }
    }

    pub async fn handle(&self, command: SetBookmark) -> Result<(), ApplicationError> {
        self.novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        let bookmark = BookmarkRecord {
            id: Uuid::new_v4(),
            user_id: command.user_id,
            novel_id: command.novel_id,
            last_read_chapter_id: command.last_read_chapter_id,
            in_library: command.in_library,
            updated_at: Utc::now(),
        };

        self.bookmark_repo.upsert(&bookmark).await?;

        Ok(())
    }
}

// ============================================================================
// CreateComment
// ============================================================================

/// 创建评论响应
#[derive(Debug, Clone)]
pub struct CreateCommentResponse {
    pub id: Uuid,
}

/// CreateComment Handler - 发表章节评论
pub struct CreateCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl CreateCommentHandler {
    pub fn new(
        comment_repo: Arc<dyn CommentRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            comment_repo,
            chapter_repo,
        }
    }

    pub async fn handle(
        &self,
        command: CreateComment,
    ) -> Result<CreateCommentResponse, ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::validation("Comment text cannot be empty"));
        }

        self.chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        let comment = CommentRecord {
            id: Uuid::new_v4(),
            chapter_id: command.chapter_id,
            user_id: command.user_id,
            text: command.text,
            created_at: Utc::now(),
        };

        self.comment_repo.create(&comment).await?;

        Ok(CreateCommentResponse { id: comment.id })
    }
}

// ============================================================================
// SaveSettings
// ============================================================================

/// SaveSettings Handler - 保存阅读偏好（未提供的字段保持当前值）
pub struct SaveSettingsHandler {
    settings_repo: Arc<dyn SettingsRepositoryPort>,
}

impl SaveSettingsHandler {
    pub fn new(settings_repo: Arc<dyn SettingsRepositoryPort>) -> Self {
        Self { settings_repo }
    }

    pub async fn handle(&self, command: SaveSettings) -> Result<SettingsRecord, ApplicationError> {
        let mut settings = self
            .settings_repo
            .find_by_user(command.user_id)
            .await?
            .unwrap_or_else(|| SettingsRecord::defaults(command.user_id));

        if let Some(font_size) = command.font_size {
            if !(8..=72).contains(&font_size) {
                return Err(ApplicationError::validation(
                    "Font size must be between 8 and 72",
                ));
            }
            settings.font_size = font_size;
        }
        if let Some(line_height) = command.line_height {
            if !(1.0..=4.0).contains(&line_height) {
                return Err(ApplicationError::validation(
                    "Line height must be between 1.0 and 4.0",
                ));
            }
            settings.line_height = line_height;
        }
        if let Some(theme) = command.theme {
            settings.theme = theme;
        }

        self.settings_repo.upsert(&settings).await?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::RepositoryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemorySettingsRepo {
        rows: Mutex<HashMap<i64, SettingsRecord>>,
    }

    #[async_trait]
    impl SettingsRepositoryPort for InMemorySettingsRepo {
        async fn find_by_user(
            &self,
            user_id: i64,
        ) -> Result<Option<SettingsRecord>, RepositoryError> {
            Ok(self.rows.lock().unwrap().get(&user_id).cloned())
        }

        async fn upsert(&self, settings: &SettingsRecord) -> Result<(), RepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(settings.user_id, settings.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn save_settings_starts_from_defaults() {
        let repo = Arc::new(InMemorySettingsRepo::default());
        let handler = SaveSettingsHandler::new(repo.clone());

        let saved = handler
            .handle(SaveSettings {
                user_id: 7,
                font_size: Some(22),
                line_height: None,
                theme: None,
            })
            .await
            .unwrap();

        assert_eq!(saved.font_size, 22);
        assert_eq!(saved.line_height, 1.8);
        assert_eq!(saved.theme, "dark");
    }

    #[tokio::test]
    async fn save_settings_keeps_existing_values() {
        let repo = Arc::new(InMemorySettingsRepo::default());
        repo.upsert(&SettingsRecord {
            user_id: 7,
            font_size: 16,
            line_height: 2.0,
            theme: "light".to_string(),
        })
        .await
        .unwrap();

        let handler = SaveSettingsHandler::new(repo.clone());
        let saved = handler
            .handle(SaveSettings {
                user_id: 7,
                font_size: None,
                line_height: None,
                theme: Some("sepia".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(saved.font_size, 16);
        assert_eq!(saved.line_height, 2.0);
        assert_eq!(saved.theme, "sepia");
    }

    #[tokio::test]
    async fn save_settings_rejects_absurd_font_size() {
        let repo = Arc::new(InMemorySettingsRepo::default());
        let handler = SaveSettingsHandler::new(repo);

        let result = handler
            .handle(SaveSettings {
                user_id: 7,
                font_size: Some(500),
                line_height: None,
                theme: None,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }
}
