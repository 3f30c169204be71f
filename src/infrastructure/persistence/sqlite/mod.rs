//! SQLite 持久化实现

mod bookmark_repo;
mod chapter_repo;
mod comment_repo;
mod database;
mod novel_repo;
mod settings_repo;
mod vote_repo;

pub use bookmark_repo::SqliteBookmarkRepository;
pub use chapter_repo::SqliteChapterRepository;
pub use comment_repo::SqliteCommentRepository;
pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use novel_repo::SqliteNovelRepository;
pub use settings_repo::SqliteSettingsRepository;
pub use vote_repo::SqliteVoteRepository;
