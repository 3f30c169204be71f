//! Domain Layer - 领域层
//!
//! 核心是 ingest：书籍源文件（EPUB/TXT）到章节序列的纯转换逻辑，
//! 不涉及任何 IO 和持久化

pub mod ingest;

pub use ingest::{BookMetadata, DraftChapter, SourceKind};
