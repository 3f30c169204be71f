//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Novel Repository
// ============================================================================

/// 新建小说的占位标题，触发元数据自动填充
pub const PLACEHOLDER_TITLE: &str = "New Novel";

/// 默认作者，容器 creator 缺失或为占位值 "0" 时保留
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// 默认分类，未被编辑修改过时允许元数据覆盖
pub const DEFAULT_GENRE: &str = "Action";

/// 连载状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NovelStatus {
    /// 连载中
    Ongoing,
    /// 已完结
    Completed,
}

impl NovelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Ongoing => "Ongoing",
            NovelStatus::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Ongoing" => Some(NovelStatus::Ongoing),
            "Completed" => Some(NovelStatus::Completed),
            _ => None,
        }
    }
}

impl Default for NovelStatus {
    fn default() -> Self {
        NovelStatus::Ongoing
    }
}

/// 小说实体（用于持久化）
#[derive(Debug, Clone)]
pub struct NovelRecord {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// 原始 / 别名标题，留空时由 title 自动填充
    pub alternative_title: Option<String>,
    pub synopsis: Option<String>,
    pub genre: String,
    pub status: NovelStatus,
    pub cover_path: Option<PathBuf>,
    /// 上传的 EPUB/TXT 源文件路径
    pub source_path: Option<PathBuf>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 小说列表行（含派生字段，用于列表页）
#[derive(Debug, Clone)]
pub struct NovelSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: NovelStatus,
    pub cover_path: Option<PathBuf>,
    /// 投票平均分（保留一位小数），无投票为 0.0
    pub rating: f64,
    pub chapter_count: i64,
    pub created_at: DateTime<Utc>,
}

/// 小说列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct NovelFilter {
    /// 标题/作者子串搜索（不区分大小写）
    pub query: Option<String>,
    /// genre 精确匹配（不区分大小写）
    pub genre: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

/// Novel Repository Port
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 保存小说（upsert）
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找小说
    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError>;

    /// 按过滤条件分页列出小说（按创建时间倒序），返回 (行, 总数)
    async fn find_page(
        &self,
        filter: &NovelFilter,
    ) -> Result<(Vec<NovelSummary>, usize), RepositoryError>;

    /// 删除小说及其级联数据（章节、投票、书签、评论）
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 浏览计数 +1
    async fn increment_views(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub title: String,
    /// 正文（HTML 片段）
    pub body: String,
    /// 排序键，小说内唯一，读取时按其升序
    pub order_key: i64,
    /// 源书中的原始章节编号（与存储顺序不一致时使用）
    pub source_index: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// 章节列表行（不含正文）
#[derive(Debug, Clone)]
pub struct ChapterSummary {
    pub id: Uuid,
    pub title: String,
    pub order_key: i64,
    pub created_at: DateTime<Utc>,
}

/// 相邻章节（阅读导航）
#[derive(Debug, Clone, Default)]
pub struct ChapterNeighbors {
    pub prev_id: Option<Uuid>,
    pub next_id: Option<Uuid>,
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 原子地替换一本小说的整个章节集
    ///
    /// 删除旧章节与插入新章节在同一个事务中执行，
    /// 失败的生成运行不会留下被截断的章节集
    async fn replace_all(
        &self,
        novel_id: Uuid,
        chapters: &[ChapterRecord],
    ) -> Result<(), RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 列出小说的所有章节（按 order key 升序，不含正文）
    async fn list_by_novel(&self, novel_id: Uuid)
        -> Result<Vec<ChapterSummary>, RepositoryError>;

    /// 小说的章节数
    async fn count_by_novel(&self, novel_id: Uuid) -> Result<usize, RepositoryError>;

    /// 查找某章的前后相邻章节
    async fn neighbors(
        &self,
        novel_id: Uuid,
        order_key: i64,
    ) -> Result<ChapterNeighbors, RepositoryError>;
}

// ============================================================================
// Vote Repository
// ============================================================================

/// 评分投票实体（(novel, user) 内唯一）
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub user_id: i64,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

/// Vote Repository Port
#[async_trait]
pub trait VoteRepositoryPort: Send + Sync {
    /// 保存投票（同一用户重复投票覆盖旧分数）
    async fn upsert(&self, vote: &VoteRecord) -> Result<(), RepositoryError>;

    /// 小说的平均分，无投票返回 None
    async fn average_for_novel(&self, novel_id: Uuid) -> Result<Option<f64>, RepositoryError>;
}

// ============================================================================
// Bookmark Repository
// ============================================================================

/// 书签实体（(user, novel) 内唯一）
#[derive(Debug, Clone)]
pub struct BookmarkRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub novel_id: Uuid,
    pub last_read_chapter_id: Option<Uuid>,
    pub in_library: bool,
    pub updated_at: DateTime<Utc>,
}

/// Bookmark Repository Port
#[async_trait]
pub trait BookmarkRepositoryPort: Send + Sync {
    /// 保存书签（同一 (user, novel) 覆盖）
    async fn upsert(&self, bookmark: &BookmarkRecord) -> Result<(), RepositoryError>;

    /// 列出用户的书签（按更新时间倒序）
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<BookmarkRecord>, RepositoryError>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// 评论实体
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Comment Repository Port
#[async_trait]
pub trait CommentRepositoryPort: Send + Sync {
    /// 创建评论
    async fn create(&self, comment: &CommentRecord) -> Result<(), RepositoryError>;

    /// 列出章节的评论（按创建时间倒序）
    async fn list_by_chapter(
        &self,
        chapter_id: Uuid,
    ) -> Result<Vec<CommentRecord>, RepositoryError>;
}

// ============================================================================
// Settings Repository
// ============================================================================

/// 用户阅读偏好
#[derive(Debug, Clone)]
pub struct SettingsRecord {
    pub user_id: i64,
    pub font_size: i64,
    pub line_height: f64,
    pub theme: String,
}

impl SettingsRecord {
    /// 某用户的默认偏好
    pub fn defaults(user_id: i64) -> Self {
        Self {
            user_id,
            font_size: 18,
            line_height: 1.8,
            theme: "dark".to_string(),
        }
    }
}

/// Settings Repository Port
#[async_trait]
pub trait SettingsRepositoryPort: Send + Sync {
    /// 查找用户偏好
    async fn find_by_user(&self, user_id: i64) -> Result<Option<SettingsRecord>, RepositoryError>;

    /// 保存用户偏好（upsert）
    async fn upsert(&self, settings: &SettingsRecord) -> Result<(), RepositoryError>;
}
