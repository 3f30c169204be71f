//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、EbookReader、SourceStorage）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Library commands
    CreateComment,
    SaveSettings,
    SetBookmark,
    // Novel commands
    CreateNovel,
    DeleteNovel,
    IngestNovelSource,
    RateNovel,
    UpdateNovel,
    // Handlers
    handlers::{
        CreateCommentHandler, CreateNovelHandler, DeleteNovelHandler, IngestNovelSourceHandler,
        IngestOutcome, RateNovelHandler, SaveSettingsHandler, SetBookmarkHandler, SkipReason,
        UpdateNovelHandler,
    },
};

pub use queries::{
    // Library queries
    GetSettings,
    ListBookmarks,
    ListComments,
    // Novel queries
    GetChapter,
    GetNovel,
    ListChapters,
    ListNovels,
    // Handlers
    handlers::{
        ChapterDetail, GetChapterHandler, GetNovelHandler, GetSettingsHandler,
        ListBookmarksHandler, ListChaptersHandler, ListCommentsHandler, ListNovelsHandler,
        NovelDetail, NovelPage,
    },
};

pub use error::ApplicationError;

pub use ports::{
    BookmarkRepositoryPort, ChapterRepositoryPort, CommentRepositoryPort, EbookReaderPort,
    NovelRepositoryPort, SettingsRepositoryPort, SourceStoragePort, VoteRepositoryPort,
};
