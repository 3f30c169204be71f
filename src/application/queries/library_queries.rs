//! Library Queries - 书架、评论、阅读偏好

use uuid::Uuid;

/// 用户书签列表查询
#[derive(Debug, Clone)]
pub struct ListBookmarks {
    pub user_id: i64,
}

/// 章节评论列表查询
#[derive(Debug, Clone)]
pub struct ListComments {
    pub chapter_id: Uuid,
}

/// 用户阅读偏好查询（无记录时返回默认值）
#[derive(Debug, Clone)]
pub struct GetSettings {
    pub user_id: i64,
}
