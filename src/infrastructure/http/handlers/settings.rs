//! Settings HTTP Handlers - 阅读偏好

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GetSettings, SaveSettings};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GetSettingsRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SaveSettingsRequest {
    pub user_id: i64,
    pub font_size: Option<i64>,
    pub line_height: Option<f64>,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub user_id: i64,
    pub font_size: i64,
    pub line_height: f64,
    pub theme: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 读取阅读偏好（无记录时返回默认值）
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GetSettingsRequest>,
) -> Result<Json<ApiResponse<SettingsResponse>>, ApiError> {
    let settings = state
        .get_settings_handler
        .handle(GetSettings {
            user_id: request.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(SettingsResponse {
        user_id: settings.user_id,
        font_size: settings.font_size,
        line_height: settings.line_height,
        theme: settings.theme,
    })))
}

/// 保存阅读偏好（未提供的字段保持当前值）
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveSettingsRequest>,
) -> Result<Json<ApiResponse<SettingsResponse>>, ApiError> {
    let settings = state
        .save_settings_handler
        .handle(SaveSettings {
            user_id: request.user_id,
            font_size: request.font_size,
            line_height: request.line_height,
            theme: request.theme,
        })
        .await?;

    Ok(Json(ApiResponse::success(SettingsResponse {
        user_id: settings.user_id,
        font_size: settings.font_size,
        line_height: settings.line_height,
        theme: settings.theme,
    })))
}
