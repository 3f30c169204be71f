//! ZenNovel - 连载小说内容管理系统
//!
//! 架构:
//! - Domain: ingest/ (章节生成领域逻辑)
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, adapters

use std::sync::Arc;

use zennovel::config::{load_config, print_config};
use zennovel::infrastructure::adapters::epub::EpubSourceReader;
use zennovel::infrastructure::adapters::storage::FileSourceStorage;
use zennovel::infrastructure::http::{AppState, HttpServer, ServerConfig};
use zennovel::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteBookmarkRepository,
    SqliteChapterRepository, SqliteCommentRepository, SqliteNovelRepository,
    SqliteSettingsRepository, SqliteVoteRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},zennovel={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("ZenNovel - 连载小说内容管理系统");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.sources_dir).await?;
    tokio::fs::create_dir_all(&config.storage.covers_dir).await?;
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let novel_repo = Arc::new(SqliteNovelRepository::new(pool.clone()));
    let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
    let vote_repo = Arc::new(SqliteVoteRepository::new(pool.clone()));
    let bookmark_repo = Arc::new(SqliteBookmarkRepository::new(pool.clone()));
    let comment_repo = Arc::new(SqliteCommentRepository::new(pool.clone()));
    let settings_repo = Arc::new(SqliteSettingsRepository::new(pool.clone()));

    // 创建出站适配器
    let ebook_reader = Arc::new(EpubSourceReader::new());
    let source_storage = Arc::new(FileSourceStorage::new(&config.storage.sources_dir).await?);

    // 创建 HTTP 服务器
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_body_size: config.storage.max_upload_size as usize,
    };
    let state = AppState::new(
        novel_repo,
        chapter_repo,
        vote_repo,
        bookmark_repo,
        comment_repo,
        settings_repo,
        ebook_reader,
        source_storage,
        &config,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
