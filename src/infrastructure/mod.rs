//! 基础设施层 - 端口的具体实现
//!
//! 包含：
//! - http: Axum HTTP 服务器与 API 处理器
//! - persistence: SQLite 仓储实现
//! - adapters: EPUB 读取器、源文件存储

pub mod adapters;
pub mod http;
pub mod persistence;
