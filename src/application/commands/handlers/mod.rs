//! Command Handlers

mod library_handlers;
mod novel_handlers;

pub use library_handlers::{
    CreateCommentHandler, CreateCommentResponse, SaveSettingsHandler, SetBookmarkHandler,
};
pub use novel_handlers::{
    apply_metadata_defaults, CreateNovelHandler, CreateNovelResponse, DeleteNovelHandler,
    IngestNovelSourceHandler, IngestOutcome, RateNovelHandler, SkipReason, UpdateNovelHandler,
};
