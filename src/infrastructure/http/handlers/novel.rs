//! Novel HTTP Handlers

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::application::ports::NovelStatus;
use crate::application::{
    CreateNovel, DeleteNovel, GetNovel, IngestNovelSource, IngestOutcome, ListNovels, RateNovel,
    SkipReason, UpdateNovel,
};
use crate::domain::ingest::SourceKind;
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateNovelRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub alternative_title: Option<String>,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNovelRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub alternative_title: Option<String>,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetNovelRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DeleteNovelRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RateNovelRequest {
    pub id: Uuid,
    pub user_id: i64,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReingestNovelRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListNovelsQuery {
    /// 标题/作者子串搜索
    pub search: Option<String>,
    /// genre 精确匹配
    pub genre: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Serialize)]
pub struct NovelCreatedResponse {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct NovelSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: String,
    pub rating: f64,
    pub chapter_count: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct NovelListResponse {
    pub novels: Vec<NovelSummaryResponse>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

#[derive(Debug, Serialize)]
pub struct NovelDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub alternative_title: Option<String>,
    pub synopsis: Option<String>,
    pub genre: String,
    pub status: String,
    pub views: i64,
    pub rating: f64,
    pub chapter_count: usize,
    pub has_source: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// 章节生成运行的上报结果
#[derive(Debug, Serialize)]
pub struct IngestReportResponse {
    pub novel_id: Uuid,
    pub status: String, // "ingested" | "partial" | "skipped" | "failed"
    pub chapters: usize,
    pub detail: Option<String>,
}

impl IngestReportResponse {
    fn from_outcome(novel_id: Uuid, outcome: IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Ingested { chapters } => Self {
                novel_id,
                status: "ingested".to_string(),
                chapters,
                detail: None,
            },
            IngestOutcome::Partial { chapters, error } => Self {
                novel_id,
                status: "partial".to_string(),
                chapters,
                detail: Some(error),
            },
            IngestOutcome::Skipped { reason } => Self {
                novel_id,
                status: "skipped".to_string(),
                chapters: 0,
                detail: Some(
                    match reason {
                        SkipReason::NoSourceFile => "no source file attached",
                        SkipReason::UnsupportedExtension => "unsupported source extension",
                    }
                    .to_string(),
                ),
            },
            IngestOutcome::Failed { error } => Self {
                novel_id,
                status: "failed".to_string(),
                chapters: 0,
                detail: Some(error),
            },
        }
    }
}

fn parse_status(raw: &str) -> Result<NovelStatus, ApiError> {
    NovelStatus::from_str(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown status: {}", raw)))
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建小说
pub async fn create_novel(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateNovelRequest>,
) -> Result<Json<ApiResponse<NovelCreatedResponse>>, ApiError> {
    let status = match request.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => NovelStatus::default(),
    };

    let response = state
        .create_novel_handler
        .handle(CreateNovel {
            title: request.title,
            author: request.author,
            alternative_title: request.alternative_title,
            synopsis: request.synopsis,
            genre: request.genre,
            status,
        })
        .await?;

    Ok(Json(ApiResponse::success(NovelCreatedResponse {
        id: response.id,
        title: response.title,
    })))
}

/// 更新小说字段
pub async fn update_novel(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateNovelRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let status = match request.status.as_deref() {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };

    state
        .update_novel_handler
        .handle(UpdateNovel {
            novel_id: request.id,
            title: request.title,
            author: request.author,
            alternative_title: request.alternative_title,
            synopsis: request.synopsis,
            genre: request.genre,
            status,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 删除小说
pub async fn delete_novel(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteNovelRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_novel_handler
        .handle(DeleteNovel {
            novel_id: request.id,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 获取小说详情（每次访问浏览计数 +1）
pub async fn get_novel(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GetNovelRequest>,
) -> Result<Json<ApiResponse<NovelDetailResponse>>, ApiError> {
    let detail = state
        .get_novel_handler
        .handle(GetNovel {
            novel_id: request.id,
        })
        .await?;

    state.novel_repo.increment_views(request.id).await?;

    let novel = detail.novel;
    Ok(Json(ApiResponse::success(NovelDetailResponse {
        id: novel.id,
        title: novel.title,
        author: novel.author,
        alternative_title: novel.alternative_title,
        synopsis: novel.synopsis,
        genre: novel.genre,
        status: novel.status.as_str().to_string(),
        // 上报给调用方的计数包含本次访问
        views: novel.views + 1,
        rating: detail.rating,
        chapter_count: detail.chapter_count,
        has_source: novel.source_path.is_some(),
        created_at: novel.created_at.to_rfc3339(),
        updated_at: novel.updated_at.to_rfc3339(),
    })))
}

/// 小说列表（分页 + 搜索 + 分类过滤）
pub async fn list_novels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListNovelsQuery>,
) -> Result<Json<ApiResponse<NovelListResponse>>, ApiError> {
    let page = state
        .list_novels_handler
        .handle(ListNovels {
            query: query.search,
            genre: query.genre,
            page: query.page,
        })
        .await?;

    let novels = page
        .novels
        .into_iter()
        .map(|n| NovelSummaryResponse {
            id: n.id,
            title: n.title,
            author: n.author,
            genre: n.genre,
            status: n.status.as_str().to_string(),
            rating: n.rating,
            chapter_count: n.chapter_count,
            created_at: n.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ApiResponse::success(NovelListResponse {
        novels,
        total: page.total,
        page: page.page,
        page_count: page.page_count,
    })))
}

/// 评分
pub async fn rate_novel(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RateNovelRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .rate_novel_handler
        .handle(RateNovel {
            novel_id: request.id,
            user_id: request.user_id,
            score: request.score,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 上传源文件（EPUB/TXT）并重新生成章节集
pub async fn upload_source(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<IngestReportResponse>>, ApiError> {
    let mut novel_id: Option<Uuid> = None;
    let mut file_ext: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "novel_id" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read novel_id: {}", e))
                })?;
                novel_id = Some(
                    Uuid::parse_str(text.trim())
                        .map_err(|e| ApiError::BadRequest(format!("Invalid novel_id: {}", e)))?,
                );
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::BadRequest("Missing file name".to_string()))?;

                // 只接受 .epub / .txt
                if SourceKind::from_path(std::path::Path::new(&filename)).is_none() {
                    return Err(ApiError::BadRequest(
                        "Only EPUB and TXT files are allowed".to_string(),
                    ));
                }
                file_ext = std::path::Path::new(&filename)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase());

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let novel_id =
        novel_id.ok_or_else(|| ApiError::BadRequest("Missing novel_id field".to_string()))?;
    let ext = file_ext.ok_or_else(|| ApiError::BadRequest("Missing file field".to_string()))?;
    let bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("Missing file field".to_string()))?;

    let path = state
        .source_storage
        .save_source(novel_id, &ext, &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save source file: {}", e)))?;

    let outcome = state
        .ingest_handler
        .handle(IngestNovelSource {
            novel_id,
            new_source_path: Some(path),
        })
        .await?;

    Ok(Json(ApiResponse::success(
        IngestReportResponse::from_outcome(novel_id, outcome),
    )))
}

/// 从小说当前源文件重新生成章节集
pub async fn reingest_novel(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReingestNovelRequest>,
) -> Result<Json<ApiResponse<IngestReportResponse>>, ApiError> {
    let outcome = state
        .ingest_handler
        .handle(IngestNovelSource {
            novel_id: request.id,
            new_source_path: None,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        IngestReportResponse::from_outcome(request.id, outcome),
    )))
}

/// 下载小说的源文件
pub async fn download_source(
    State(state): State<Arc<AppState>>,
    Path(novel_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let novel = state
        .novel_repo
        .find_by_id(novel_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::NotFound(format!("Novel not found: {}", novel_id)))?;

    let source_path = novel
        .source_path
        .ok_or_else(|| ApiError::NotFound(format!("No source file for novel: {}", novel_id)))?;
    // 不做同步的存在性检查，open 失败时区分“文件不在”与其它 IO 错误
    let file = match tokio::fs::File::open(&source_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!(
                "Source file missing on disk: {}",
                novel_id
            )));
        }
        Err(e) => {
            return Err(ApiError::Internal(format!(
                "Failed to open source file: {}",
                e
            )));
        }
    };

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?;
    let file_size = metadata.len();

    let content_type = match source_path.extension().and_then(|e| e.to_str()) {
        Some("epub") => "application/epub+zip",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    };

    // 流式返回文件内容
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}.{}\"",
                novel_id,
                source_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("bin")
            ),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::application::ports::NovelRecord;
    use crate::config::AppConfig;
    use crate::infrastructure::adapters::epub::EpubSourceReader;
    use crate::infrastructure::adapters::storage::FileSourceStorage;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteBookmarkRepository,
        SqliteChapterRepository, SqliteCommentRepository, SqliteNovelRepository,
        SqliteSettingsRepository, SqliteVoteRepository,
    };

    /// 在内存数据库和临时存储目录上组装完整的应用状态
    async fn test_state(storage_dir: &std::path::Path) -> Arc<AppState> {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let novel_repo = Arc::new(SqliteNovelRepository::new(pool.clone()));
        let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
        let vote_repo = Arc::new(SqliteVoteRepository::new(pool.clone()));
        let bookmark_repo = Arc::new(SqliteBookmarkRepository::new(pool.clone()));
        let comment_repo = Arc::new(SqliteCommentRepository::new(pool.clone()));
        let settings_repo = Arc::new(SqliteSettingsRepository::new(pool));
        let source_storage = Arc::new(FileSourceStorage::new(storage_dir).await.unwrap());
        let ebook_reader = Arc::new(EpubSourceReader::new());

        Arc::new(AppState::new(
            novel_repo,
            chapter_repo,
            vote_repo,
            bookmark_repo,
            comment_repo,
            settings_repo,
            ebook_reader,
            source_storage,
            &AppConfig::default(),
        ))
    }

    fn novel_with_source(id: Uuid, source_path: std::path::PathBuf) -> NovelRecord {
        let now = Utc::now();
        NovelRecord {
            id,
            title: "T".to_string(),
            author: "A".to_string(),
            alternative_title: Some("T".to_string()),
            synopsis: None,
            genre: "Action".to_string(),
            status: NovelStatus::Ongoing,
            cover_path: None,
            source_path: Some(source_path),
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_download_source_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        // 记录里有路径，磁盘上没有文件
        let novel_id = Uuid::new_v4();
        let gone = dir.path().join(format!("{}.epub", novel_id));
        let novel = novel_with_source(novel_id, gone);
        state.novel_repo.save(&novel).await.unwrap();

        let result = download_source(State(state), Path(novel_id)).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_download_source_streams_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let novel_id = Uuid::new_v4();
        let source_path = dir.path().join(format!("{}.txt", novel_id));
        tokio::fs::write(&source_path, b"hello world").await.unwrap();
        let novel = novel_with_source(novel_id, source_path);
        state.novel_repo.save(&novel).await.unwrap();

        let response = download_source(State(state), Path(novel_id)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"hello world");
    }
}
