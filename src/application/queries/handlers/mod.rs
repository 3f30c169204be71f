//! Query Handlers

mod library_handlers;
mod novel_handlers;

pub use library_handlers::{GetSettingsHandler, ListBookmarksHandler, ListCommentsHandler};
pub use novel_handlers::{
    ChapterDetail, GetChapterHandler, GetNovelHandler, ListChaptersHandler, ListNovelsHandler,
    NovelDetail, NovelPage,
};
