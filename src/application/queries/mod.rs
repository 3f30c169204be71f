//! Queries - 读操作定义及处理器

pub mod handlers;

mod library_queries;
mod novel_queries;

pub use library_queries::{GetSettings, ListBookmarks, ListComments};
pub use novel_queries::{GetChapter, GetNovel, ListChapters, ListNovels};
