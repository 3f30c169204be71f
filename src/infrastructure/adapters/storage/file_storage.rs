//! File Storage - 文件系统源文件存储实现
//!
//! 实现 SourceStoragePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{SourceStorageError, SourceStoragePort};

/// 文件系统源文件存储
pub struct FileSourceStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileSourceStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, SourceStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| SourceStorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl SourceStoragePort for FileSourceStorage {
    fn source_path(&self, novel_id: Uuid, ext: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", novel_id, ext))
    }

    async fn save_source(
        &self,
        novel_id: Uuid,
        ext: &str,
        data: &[u8],
    ) -> Result<PathBuf, SourceStorageError> {
        let path = self.source_path(novel_id, ext);

        fs::write(&path, data)
            .await
            .map_err(|e| SourceStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved source: novel={}, size={} bytes",
            novel_id,
            data.len()
        );

        Ok(path)
    }

    async fn read_source(&self, path: &Path) -> Result<Vec<u8>, SourceStorageError> {
        if !path.exists() {
            return Err(SourceStorageError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        fs::read(path)
            .await
            .map_err(|e| SourceStorageError::IoError(e.to_string()))
    }

    async fn delete_source(&self, path: &Path) -> Result<(), SourceStorageError> {
        if path.exists() {
            fs::remove_file(path)
                .await
                .map_err(|e| SourceStorageError::IoError(e.to_string()))?;

            tracing::debug!("Deleted source: {}", path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_read_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSourceStorage::new(dir.path()).await.unwrap();
        let novel_id = Uuid::new_v4();

        let path = storage
            .save_source(novel_id, "txt", b"hello world")
            .await
            .unwrap();
        assert_eq!(storage.read_source(&path).await.unwrap(), b"hello world");

        storage.delete_source(&path).await.unwrap();
        assert!(matches!(
            storage.read_source(&path).await,
            Err(SourceStorageError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSourceStorage::new(dir.path()).await.unwrap();

        storage
            .delete_source(&dir.path().join("missing.epub"))
            .await
            .unwrap();
    }
}
