//! Library Commands - 书架、评论、阅读偏好

use uuid::Uuid;

/// 设置书签命令（同一 (user, novel) 覆盖旧值）
#[derive(Debug, Clone)]
pub struct SetBookmark {
    pub user_id: i64,
    pub novel_id: Uuid,
    pub last_read_chapter_id: Option<Uuid>,
    pub in_library: bool,
}

/// 发表评论命令
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub chapter_id: Uuid,
    pub user_id: i64,
    pub text: String,
}

/// 保存阅读偏好命令（None 表示保持当前值）
#[derive(Debug, Clone)]
pub struct SaveSettings {
    pub user_id: i64,
    pub font_size: Option<i64>,
    pub line_height: Option<f64>,
    pub theme: Option<String>,
}
