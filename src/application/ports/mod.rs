//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod ebook_reader;
mod repositories;
mod source_storage;

pub use ebook_reader::{ChapterScan, EbookReaderPort, IngestError};
pub use repositories::{
    BookmarkRecord, BookmarkRepositoryPort, ChapterNeighbors, ChapterRecord,
    ChapterRepositoryPort, ChapterSummary, CommentRecord, CommentRepositoryPort, NovelFilter,
    NovelRecord, NovelRepositoryPort, NovelStatus, NovelSummary, RepositoryError, SettingsRecord,
    SettingsRepositoryPort, VoteRecord, VoteRepositoryPort, DEFAULT_AUTHOR, DEFAULT_GENRE,
    PLACEHOLDER_TITLE,
};
pub use source_storage::{SourceStorageError, SourceStoragePort};
