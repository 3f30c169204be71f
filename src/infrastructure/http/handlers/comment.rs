//! Comment HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{CreateComment, ListComments};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub chapter_id: Uuid,
    pub user_id: i64,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsRequest {
    pub chapter_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub user_id: i64,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub chapter_id: Uuid,
    pub total: usize,
    pub comments: Vec<CommentResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 发表章节评论
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Json<ApiResponse<CommentCreatedResponse>>, ApiError> {
    let response = state
        .create_comment_handler
        .handle(CreateComment {
            chapter_id: request.chapter_id,
            user_id: request.user_id,
            text: request.text,
        })
        .await?;

    Ok(Json(ApiResponse::success(CommentCreatedResponse {
        id: response.id,
    })))
}

/// 章节评论列表（按创建时间倒序）
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ListCommentsRequest>,
) -> Result<Json<ApiResponse<CommentListResponse>>, ApiError> {
    let comments = state
        .list_comments_handler
        .handle(ListComments {
            chapter_id: request.chapter_id,
        })
        .await?;

    let comments: Vec<CommentResponse> = comments
        .into_iter()
        .map(|c| CommentResponse {
            id: c.id,
            user_id: c.user_id,
            text: c.text,
            created_at: c.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ApiResponse::success(CommentListResponse {
        chapter_id: request.chapter_id,
        total: comments.len(),
        comments,
    })))
}
