//! ZenNovel - 小说内容管理与阅读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Ingest: EPUB/TXT → 章节序列的纯转换逻辑
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, EbookReader, SourceStorage）
//! - Commands: CQRS 命令处理器（含章节生成编排器）
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 存储
//! - Adapters: EPUB Reader、源文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
