//! Bookmark HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{ListBookmarks, SetBookmark};
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetBookmarkRequest {
    pub user_id: i64,
    pub novel_id: Uuid,
    pub last_read_chapter_id: Option<Uuid>,
    #[serde(default)]
    pub in_library: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListBookmarksRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub novel_id: Uuid,
    pub last_read_chapter_id: Option<Uuid>,
    pub in_library: bool,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct BookmarkListResponse {
    pub user_id: i64,
    pub bookmarks: Vec<BookmarkResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 设置书签（同一 (user, novel) 覆盖旧值）
pub async fn set_bookmark(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetBookmarkRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .set_bookmark_handler
        .handle(SetBookmark {
            user_id: request.user_id,
            novel_id: request.novel_id,
            last_read_chapter_id: request.last_read_chapter_id,
            in_library: request.in_library,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 用户书签列表（按更新时间倒序）
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ListBookmarksRequest>,
) -> Result<Json<ApiResponse<BookmarkListResponse>>, ApiError> {
    let bookmarks = state
        .list_bookmarks_handler
        .handle(ListBookmarks {
            user_id: request.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookmarkListResponse {
        user_id: request.user_id,
        bookmarks: bookmarks
            .into_iter()
            .map(|b| BookmarkResponse {
                novel_id: b.novel_id,
                last_read_chapter_id: b.last_read_chapter_id,
                in_library: b.in_library,
                updated_at: b.updated_at.to_rfc3339(),
            })
            .collect(),
    })))
}
