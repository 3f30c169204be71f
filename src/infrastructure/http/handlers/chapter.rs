//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{GetChapter, ListChapters};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GetChapterRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListChaptersRequest {
    pub novel_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub novel_title: String,
    pub title: String,
    /// 正文（HTML 片段）
    pub body: String,
    pub order_key: i64,
    /// 阅读导航：前后相邻章节
    pub prev_id: Option<Uuid>,
    pub next_id: Option<Uuid>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ChapterSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub order_key: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ChapterListResponse {
    pub novel_id: Uuid,
    pub total: usize,
    pub chapters: Vec<ChapterSummaryResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 章节正文（含前后章节导航）
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GetChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let detail = state
        .get_chapter_handler
        .handle(GetChapter {
            chapter_id: request.id,
        })
        .await?;

    let chapter = detail.chapter;
    Ok(Json(ApiResponse::success(ChapterResponse {
        id: chapter.id,
        novel_id: chapter.novel_id,
        novel_title: detail.novel_title,
        title: chapter.title,
        body: chapter.body,
        order_key: chapter.order_key,
        prev_id: detail.neighbors.prev_id,
        next_id: detail.neighbors.next_id,
        created_at: chapter.created_at.to_rfc3339(),
    })))
}

/// 小说目录（按 order key 升序，不含正文）
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ListChaptersRequest>,
) -> Result<Json<ApiResponse<ChapterListResponse>>, ApiError> {
    let chapters = state
        .list_chapters_handler
        .handle(ListChapters {
            novel_id: request.novel_id,
        })
        .await?;

    let chapters: Vec<ChapterSummaryResponse> = chapters
        .into_iter()
        .map(|c| ChapterSummaryResponse {
            id: c.id,
            title: c.title,
            order_key: c.order_key,
            created_at: c.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ApiResponse::success(ChapterListResponse {
        novel_id: request.novel_id,
        total: chapters.len(),
        chapters,
    })))
}
