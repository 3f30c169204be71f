//! EPUB 适配器

mod reader;

pub use reader::EpubSourceReader;
