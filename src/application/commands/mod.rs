//! Commands - 写操作定义及处理器

pub mod handlers;

mod library_commands;
mod novel_commands;

pub use library_commands::{CreateComment, SaveSettings, SetBookmark};
pub use novel_commands::{CreateNovel, DeleteNovel, IngestNovelSource, RateNovel, UpdateNovel};
