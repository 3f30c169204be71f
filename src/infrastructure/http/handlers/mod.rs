//! HTTP Handlers

mod bookmark;
mod chapter;
mod comment;
mod novel;
mod ping;
mod settings;

pub use bookmark::*;
pub use chapter::*;
pub use comment::*;
pub use novel::*;
pub use ping::*;
pub use settings::*;
