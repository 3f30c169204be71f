//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping                     GET   健康检查
//! - /api/novel/create             POST  创建小说
//! - /api/novel/update             POST  更新小说字段
//! - /api/novel/delete             POST  删除小说
//! - /api/novel/get                POST  获取小说详情（浏览计数 +1）
//! - /api/novel/list               GET   小说列表（分页、搜索、分类过滤）
//! - /api/novel/rate               POST  评分
//! - /api/novel/upload_source      POST  上传 EPUB/TXT 源文件并生成章节
//! - /api/novel/ingest             POST  从当前源文件重新生成章节
//! - /api/novel/source/:novel_id   GET   下载源文件
//! - /api/chapter/get              POST  章节正文（含前后导航）
//! - /api/chapter/list             POST  小说目录
//! - /api/bookmark/set             POST  设置书签
//! - /api/bookmark/list            POST  用户书签列表
//! - /api/comment/create           POST  发表评论
//! - /api/comment/list             POST  章节评论列表
//! - /api/settings/get             POST  读取阅读偏好
//! - /api/settings/set             POST  保存阅读偏好

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/novel", novel_routes())
        .nest("/chapter", chapter_routes())
        .nest("/bookmark", bookmark_routes())
        .nest("/comment", comment_routes())
        .nest("/settings", settings_routes())
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_novel))
        .route("/update", post(handlers::update_novel))
        .route("/delete", post(handlers::delete_novel))
        .route("/get", post(handlers::get_novel))
        .route("/list", get(handlers::list_novels))
        .route("/rate", post(handlers::rate_novel))
        .route("/upload_source", post(handlers::upload_source))
        .route("/ingest", post(handlers::reingest_novel))
        .route("/source/:novel_id", get(handlers::download_source))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_chapter))
        .route("/list", post(handlers::list_chapters))
}

/// Bookmark 路由
fn bookmark_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/set", post(handlers::set_bookmark))
        .route("/list", post(handlers::list_bookmarks))
}

/// Comment 路由
fn comment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_comment))
        .route("/list", post(handlers::list_comments))
}

/// Settings 路由
fn settings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_settings))
        .route("/set", post(handlers::save_settings))
}
