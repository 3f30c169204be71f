//! Novel Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{
    CreateNovel, DeleteNovel, IngestNovelSource, RateNovel, UpdateNovel,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, EbookReaderPort, NovelRecord, NovelRepositoryPort,
    SourceStoragePort, VoteRecord, VoteRepositoryPort, DEFAULT_AUTHOR, DEFAULT_GENRE,
    PLACEHOLDER_TITLE,
};
use crate::config::IngestConfig;
use crate::domain::ingest::{chunk_plain_text, decode_plain_text, BookMetadata, SourceKind};

// ============================================================================
// CreateNovel
// ============================================================================

/// 创建小说响应
#[derive(Debug, Clone)]
pub struct CreateNovelResponse {
    pub id: Uuid,
    pub title: String,
}

/// CreateNovel Handler - 创建小说记录
///
/// 留空的标题/作者落为占位值，等后续源文件生成时自动填充
pub struct CreateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl CreateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: CreateNovel) -> Result<CreateNovelResponse, ApplicationError> {
        let novel_id = Uuid::new_v4();
        let now = Utc::now();

        let title = command
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
        let author = command
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let genre = command
            .genre
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GENRE.to_string());

        let mut novel = NovelRecord {
            id: novel_id,
            title: title.clone(),
            author,
            alternative_title: command.alternative_title,
            synopsis: command.synopsis,
            genre,
            status: command.status,
            cover_path: None,
            source_path: None,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        autofill_alternative_title(&mut novel);

        self.novel_repo.save(&novel).await?;

        tracing::info!(novel_id = %novel_id, title = %title, "Novel created");

        Ok(CreateNovelResponse { id: novel_id, title })
    }
}

// ============================================================================
// UpdateNovel
// ============================================================================

/// UpdateNovel Handler - 更新小说字段（None 字段保持不变）
pub struct UpdateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl UpdateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: UpdateNovel) -> Result<(), ApplicationError> {
        let mut novel = self
            .novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        if let Some(title) = command.title {
            novel.title = title;
        }
        if let Some(author) = command.author {
            novel.author = author;
        }
        if let Some(alternative_title) = command.alternative_title {
            novel.alternative_title = Some(alternative_title);
        }
        if let Some(synopsis) = command.synopsis {
            novel.synopsis = Some(synopsis);
        }
        if let Some(genre) = command.genre {
            novel.genre = genre;
        }
        if let Some(status) = command.status {
            novel.status = status;
        }
        autofill_alternative_title(&mut novel);
        novel.updated_at = Utc::now();

        self.novel_repo.save(&novel).await?;

        tracing::info!(novel_id = %command.novel_id, "Novel updated");

        Ok(())
    }
}

// ============================================================================
// DeleteNovel
// ============================================================================

/// DeleteNovel Handler - 删除小说及其源文件
pub struct DeleteNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    source_storage: Arc<dyn SourceStoragePort>,
}

impl DeleteNovelHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        source_storage: Arc<dyn SourceStoragePort>,
    ) -> Self {
        Self {
            novel_repo,
            source_storage,
        }
    }

    pub async fn handle(&self, command: DeleteNovel) -> Result<(), ApplicationError> {
        let novel = self
            .novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        // 章节、投票、书签、评论由数据库级联清理
        self.novel_repo.delete(command.novel_id).await?;

        if let Some(path) = &novel.source_path {
            if let Err(e) = self.source_storage.delete_source(path).await {
                tracing::warn!(novel_id = %command.novel_id, error = %e, "Failed to delete source file");
            }
        }

        tracing::info!(novel_id = %command.novel_id, "Novel deleted");

        Ok(())
    }
}

// ============================================================================
// RateNovel
// ============================================================================

/// RateNovel Handler - 记录评分（同一用户重复评分覆盖）
pub struct RateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    vote_repo: Arc<dyn VoteRepositoryPort>,
}

impl RateNovelHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        vote_repo: Arc<dyn VoteRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            vote_repo,
        }
    }

    pub async fn handle(&self, command: RateNovel) -> Result<(), ApplicationError> {
        if !(1..=5).contains(&command.score) {
            return Err(ApplicationError::validation("Score must be between 1 and 5"));
        }

        self.novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        let vote = VoteRecord {
            id: Uuid::new_v4(),
            novel_id: command.novel_id,
            user_id: command.user_id,
            score: command.score,
            created_at: Utc::now(),
        };

        self.vote_repo.upsert(&vote).await?;

        Ok(())
    }
}

// ============================================================================
// IngestNovelSource
// ============================================================================

/// 跳过生成的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 小说没有附加源文件
    NoSourceFile,
    /// 源文件扩展名不是 .epub / .txt
    UnsupportedExtension,
}

/// 一次章节生成运行的结果
///
/// 解析类失败不作为 Err 冒泡，而是落在 `Failed` / `Partial` 分支里，
/// 调用方据此上报而不中断请求；只有仓储错误才返回 Err
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// 全部文档条目遍历完成
    Ingested { chapters: usize },
    /// 遍历中途失败，已发出的章节保留
    Partial { chapters: usize, error: String },
    /// 未执行生成，现有章节不动
    Skipped { reason: SkipReason },
    /// 源文件无法打开或读取，未写入任何章节
    Failed { error: String },
}

/// IngestNovelSource Handler - 从源文件重新生成章节集
///
/// 三个阶段：提取元数据 -> 填充小说空字段 -> 遍历生成章节。
/// 新章节集原子替换旧集，生成失败不会留下半套章节
pub struct IngestNovelSourceHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ebook_reader: Arc<dyn EbookReaderPort>,
    source_storage: Arc<dyn SourceStoragePort>,
    config: IngestConfig,
}

impl IngestNovelSourceHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        ebook_reader: Arc<dyn EbookReaderPort>,
        source_storage: Arc<dyn SourceStoragePort>,
        config: IngestConfig,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
            ebook_reader,
            source_storage,
            config,
        }
    }

    pub async fn handle(
        &self,
        command: IngestNovelSource,
    ) -> Result<IngestOutcome, ApplicationError> {
        let mut novel = self
            .novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        if let Some(path) = command.new_source_path {
            novel.source_path = Some(path);
            novel.updated_at = Utc::now();
            self.novel_repo.save(&novel).await?;
        }

        let source_path = match &novel.source_path {
            Some(path) => path.clone(),
            None => {
                tracing::debug!(novel_id = %novel.id, "No source file attached, skipping ingest");
                return Ok(IngestOutcome::Skipped {
                    reason: SkipReason::NoSourceFile,
                });
            }
        };

        let kind = match SourceKind::from_path(&source_path) {
            Some(kind) => kind,
            None => {
                tracing::warn!(
                    novel_id = %novel.id,
                    path = %source_path.display(),
                    "Unsupported source extension, skipping ingest"
                );
                return Ok(IngestOutcome::Skipped {
                    reason: SkipReason::UnsupportedExtension,
                });
            }
        };

        match kind {
            SourceKind::Epub => self.ingest_epub(&mut novel, &source_path).await,
            SourceKind::PlainText => self.ingest_plain_text(&novel, &source_path).await,
        }
    }

    async fn ingest_epub(
        &self,
        novel: &mut NovelRecord,
        source_path: &std::path::Path,
    ) -> Result<IngestOutcome, ApplicationError> {
        // 阶段一、二：提取元数据并填充小说的空字段
        let metadata = self.ebook_reader.read_metadata(source_path).await;
        if apply_metadata_defaults(novel, &metadata) {
            novel.updated_at = Utc::now();
            self.novel_repo.save(novel).await?;
        }

        // 阶段三：遍历文档条目生成章节
        let scan = match self
            .ebook_reader
            .scan_chapters(source_path, self.config.min_body_chars)
            .await
        {
            Ok(scan) => scan,
            Err(e) => {
                tracing::error!(novel_id = %novel.id, error = %e, "Failed to open ebook container");
                return Ok(IngestOutcome::Failed {
                    error: e.to_string(),
                });
            }
        };

        let records = draft_to_records(novel.id, scan.chapters);
        self.chapter_repo.replace_all(novel.id, &records).await?;

        let count = records.len();
        match scan.error {
            Some(error) => {
                tracing::warn!(
                    novel_id = %novel.id,
                    chapters = count,
                    error = %error,
                    "Ebook walk stopped early, partial chapter set saved"
                );
                Ok(IngestOutcome::Partial {
                    chapters: count,
                    error,
                })
            }
            None => {
                tracing::info!(novel_id = %novel.id, chapters = count, "Chapters generated from ebook");
                Ok(IngestOutcome::Ingested { chapters: count })
            }
        }
    }

    async fn ingest_plain_text(
        &self,
        novel: &NovelRecord,
        source_path: &std::path::Path,
    ) -> Result<IngestOutcome, ApplicationError> {
        let bytes = match self.source_storage.read_source(source_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(novel_id = %novel.id, error = %e, "Failed to read text source");
                return Ok(IngestOutcome::Failed {
                    error: e.to_string(),
                });
            }
        };

        let text = decode_plain_text(&bytes);
        let drafts = chunk_plain_text(&text, self.config.lines_per_chapter);
        let records = draft_to_records(novel.id, drafts);

        self.chapter_repo.replace_all(novel.id, &records).await?;

        tracing::info!(novel_id = %novel.id, chapters = records.len(), "Chapters generated from text");

        Ok(IngestOutcome::Ingested {
            chapters: records.len(),
        })
    }
}

/// 标题是否仍是占位值（空白 / "New Novel" / "."）
fn title_is_placeholder(title: &str) -> bool {
    let t = title.trim();
    t.is_empty() || t == PLACEHOLDER_TITLE || t == "."
}

/// 别名标题是否视为缺失（None / 空白 / 字面量 "{title}"）
fn alternative_title_missing(alt: Option<&str>) -> bool {
    match alt {
        Some(s) => {
            let s = s.trim();
            s.is_empty() || s == "{title}"
        }
        None => true,
    }
}

/// 缺失的别名标题用主标题填充；主标题还是占位值时不填
///
/// 返回是否有修改
fn autofill_alternative_title(novel: &mut NovelRecord) -> bool {
    if alternative_title_missing(novel.alternative_title.as_deref())
        && !title_is_placeholder(&novel.title)
    {
        novel.alternative_title = Some(novel.title.clone());
        return true;
    }
    false
}

/// 用容器元数据填充小说的占位/空字段，返回是否有字段被修改
///
/// 已由编辑填写的字段从不覆盖
pub fn apply_metadata_defaults(novel: &mut NovelRecord, metadata: &BookMetadata) -> bool {
    let mut changed = false;

    if title_is_placeholder(&novel.title) {
        if let Some(title) = &metadata.title {
            novel.title = title.clone();
            changed = true;
        }
    }

    let author_is_placeholder = {
        let a = novel.author.trim();
        a.is_empty() || a == DEFAULT_AUTHOR
    };
    if author_is_placeholder {
        if let Some(author) = &metadata.author {
            novel.author = author.clone();
            changed = true;
        }
    }

    let synopsis_is_blank = novel
        .synopsis
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true);
    if synopsis_is_blank {
        if let Some(synopsis) = &metadata.synopsis {
            novel.synopsis = Some(synopsis.clone());
            changed = true;
        }
    }

    // 默认分类视同未填写
    let genre_is_default = {
        let g = novel.genre.trim();
        g.is_empty() || g == DEFAULT_GENRE
    };
    if genre_is_default {
        if let Some(genre) = &metadata.genre {
            novel.genre = genre.clone();
            changed = true;
        }
    }

    changed |= autofill_alternative_title(novel);

    changed
}

fn draft_to_records(
    novel_id: Uuid,
    drafts: Vec<crate::domain::ingest::DraftChapter>,
) -> Vec<ChapterRecord> {
    let now = Utc::now();
    drafts
        .into_iter()
        .map(|draft| ChapterRecord {
            id: Uuid::new_v4(),
            novel_id,
            title: draft.title,
            body: draft.body,
            order_key: draft.order_key,
            source_index: draft.source_index,
            created_at: now,
        })
        .collect()
}
