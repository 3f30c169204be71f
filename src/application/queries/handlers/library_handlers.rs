//! Library Query Handlers - 书架、评论、阅读偏好

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookmarkRecord, BookmarkRepositoryPort, CommentRecord, CommentRepositoryPort, SettingsRecord,
    SettingsRepositoryPort,
};
use crate::application::queries::{GetSettings, ListBookmarks, ListComments};

/// ListBookmarks Handler - 用户书签（按更新时间倒序）
pub struct ListBookmarksHandler {
    bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
}

impl ListBookmarksHandler {
    pub fn new(bookmark_repo: Arc<dyn BookmarkRepositoryPort>) -> Self {
        Self { bookmark_repo }
    }

    pub async fn handle(
        &self,
        query: ListBookmarks,
    ) -> Result<Vec<BookmarkRecord>, ApplicationError> {
        Ok(self.bookmark_repo.list_by_user(query.user_id).await?)
    }
}

/// ListComments Handler - 章节评论（按创建时间倒序）
pub struct ListCommentsHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl ListCommentsHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, query: ListComments) -> Result<Vec<CommentRecord>, ApplicationError> {
        Ok(self.comment_repo.list_by_chapter(query.chapter_id).await?)
    }
}

/// GetSettings Handler - 阅读偏好（无记录时返回默认值，不落库）
pub struct GetSettingsHandler {
    settings_repo: Arc<dyn SettingsRepositoryPort>,
}

impl GetSettingsHandler {
    pub fn new(settings_repo: Arc<dyn SettingsRepositoryPort>) -> Self {
        Self { settings_repo }
    }

    pub async fn handle(&self, query: GetSettings) -> Result<SettingsRecord, ApplicationError> {
        Ok(self
            .settings_repo
            .find_by_user(query.user_id)
            .await?
            .unwrap_or_else(|| SettingsRecord::defaults(query.user_id)))
    }
}
