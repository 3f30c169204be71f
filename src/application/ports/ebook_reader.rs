//! Ebook Reader Port - 出站端口
//!
//! 定义电子书容器访问的抽象接口
//! 具体实现在 infrastructure 层（epub crate 适配器）

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::ingest::{BookMetadata, DraftChapter};

/// 源文件解析错误
#[derive(Debug, Error)]
pub enum IngestError {
    /// 文件缺失、损坏的归档、解码失败
    #[error("Unreadable source: {0}")]
    UnreadableSource(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 容器遍历的结果
#[derive(Debug, Clone)]
pub struct ChapterScan {
    /// 按发出顺序排列的章节，order key 已从 1 起赋好
    pub chapters: Vec<DraftChapter>,
    /// 遍历中途读取失败时的错误信息；已发出的章节保留（部分结果）
    pub error: Option<String>,
}

/// Ebook Reader Port - 出站端口
///
/// 打开打包的电子书容器，读取描述性元数据并遍历文档条目
#[async_trait]
pub trait EbookReaderPort: Send + Sync {
    /// 提取描述性元数据（title/creator/description/subject）
    ///
    /// 读取容器的任何失败都被吞掉并记录日志，
    /// 返回失败前已成功提取的字段——缺失键表示"未找到"
    async fn read_metadata(&self, path: &Path) -> BookMetadata;

    /// 按容器原生顺序遍历文档条目，生成章节序列
    ///
    /// 容器无法打开时返回 Err；遍历中途失败返回 Ok 且
    /// `ChapterScan::error` 为 Some（已发出章节保留）
    async fn scan_chapters(
        &self,
        path: &Path,
        min_body_chars: usize,
    ) -> Result<ChapterScan, IngestError>;
}
