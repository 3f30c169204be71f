//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CreateCommentHandler, CreateNovelHandler, DeleteNovelHandler, IngestNovelSourceHandler,
    RateNovelHandler, SaveSettingsHandler, SetBookmarkHandler, UpdateNovelHandler,
    // Query handlers
    GetChapterHandler, GetNovelHandler, GetSettingsHandler, ListBookmarksHandler,
    ListChaptersHandler, ListCommentsHandler, ListNovelsHandler,
    // Ports
    BookmarkRepositoryPort, ChapterRepositoryPort, CommentRepositoryPort, EbookReaderPort,
    NovelRepositoryPort, SettingsRepositoryPort, SourceStoragePort, VoteRepositoryPort,
};
use crate::config::AppConfig;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub novel_repo: Arc<dyn NovelRepositoryPort>,
    pub chapter_repo: Arc<dyn ChapterRepositoryPort>,
    pub source_storage: Arc<dyn SourceStoragePort>,

    // ========== Command Handlers ==========
    pub create_novel_handler: CreateNovelHandler,
    pub update_novel_handler: UpdateNovelHandler,
    pub delete_novel_handler: DeleteNovelHandler,
    pub rate_novel_handler: RateNovelHandler,
    pub ingest_handler: IngestNovelSourceHandler,
    pub set_bookmark_handler: SetBookmarkHandler,
    pub create_comment_handler: CreateCommentHandler,
    pub save_settings_handler: SaveSettingsHandler,

    // ========== Query Handlers ==========
    pub get_novel_handler: GetNovelHandler,
    pub list_novels_handler: ListNovelsHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub list_bookmarks_handler: ListBookmarksHandler,
    pub list_comments_handler: ListCommentsHandler,
    pub get_settings_handler: GetSettingsHandler,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        vote_repo: Arc<dyn VoteRepositoryPort>,
        bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
        settings_repo: Arc<dyn SettingsRepositoryPort>,
        ebook_reader: Arc<dyn EbookReaderPort>,
        source_storage: Arc<dyn SourceStoragePort>,
        config: &AppConfig,
    ) -> Self {
        Self {
            // Ports
            novel_repo: novel_repo.clone(),
            chapter_repo: chapter_repo.clone(),
            source_storage: source_storage.clone(),

            // Command handlers
            create_novel_handler: CreateNovelHandler::new(novel_repo.clone()),
            update_novel_handler: UpdateNovelHandler::new(novel_repo.clone()),
            delete_novel_handler: DeleteNovelHandler::new(
                novel_repo.clone(),
                source_storage.clone(),
            ),
            rate_novel_handler: RateNovelHandler::new(novel_repo.clone(), vote_repo.clone()),
            ingest_handler: IngestNovelSourceHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
                ebook_reader.clone(),
                source_storage.clone(),
                config.ingest.clone(),
            ),
            set_bookmark_handler: SetBookmarkHandler::new(
                bookmark_repo.clone(),
                novel_repo.clone(),
            ),
            create_comment_handler: CreateCommentHandler::new(
                comment_repo.clone(),
                chapter_repo.clone(),
            ),
            save_settings_handler: SaveSettingsHandler::new(settings_repo.clone()),

            // Query handlers
            get_novel_handler: GetNovelHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
                vote_repo.clone(),
            ),
            list_novels_handler: ListNovelsHandler::new(novel_repo.clone(), config.api.page_size),
            get_chapter_handler: GetChapterHandler::new(novel_repo.clone(), chapter_repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            list_bookmarks_handler: ListBookmarksHandler::new(bookmark_repo.clone()),
            list_comments_handler: ListCommentsHandler::new(comment_repo.clone()),
            get_settings_handler: GetSettingsHandler::new(settings_repo.clone()),
        }
    }
}
