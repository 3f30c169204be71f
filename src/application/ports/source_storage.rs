//! Source Storage Port - 出站端口
//!
//! 定义上传源文件（EPUB/TXT）落盘存取的抽象接口

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// 源文件存储错误
#[derive(Debug, Error)]
pub enum SourceStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Source Storage Port - 出站端口
///
/// 将小说附加的源文件解析为可读的本地路径
#[async_trait]
pub trait SourceStoragePort: Send + Sync {
    /// 小说源文件的存储路径
    fn source_path(&self, novel_id: Uuid, ext: &str) -> PathBuf;

    /// 保存上传的源文件，返回落盘路径
    async fn save_source(
        &self,
        novel_id: Uuid,
        ext: &str,
        data: &[u8],
    ) -> Result<PathBuf, SourceStorageError>;

    /// 读取源文件内容
    async fn read_source(&self, path: &Path) -> Result<Vec<u8>, SourceStorageError>;

    /// 删除源文件（不存在时静默成功）
    async fn delete_source(&self, path: &Path) -> Result<(), SourceStorageError>;
}
