//! Ingest - 章节生成领域逻辑
//!
//! 将上传的书籍源文件转换为有序章节序列：
//! - markup: EPUB 条目的 HTML → 章节标题 + 正文
//! - txt: 纯文本 → 固定行数分批的章节
//! - metadata: EPUB 元数据的清洗规则
//!
//! 不变量:
//! - 章节 order key 在一本小说内唯一，按生成顺序从 1 起严格递增
//! - 被丢弃的条目（正文过短）不占用 order key

mod markup;
mod metadata;
mod txt;

use std::path::Path;

pub use markup::{chapter_from_markup, MarkupEntry};
pub use metadata::{clean_author, genre_from_subjects, strip_tags, BookMetadata};
pub use txt::{chunk_plain_text, decode_plain_text};

/// 源文件类型（按文件名后缀分发）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// 打包的电子书容器（zip: OPF 元数据 + XHTML 文档）
    Epub,
    /// 按行分隔的纯文本
    PlainText,
}

impl SourceKind {
    /// 根据文件后缀识别源类型（不区分大小写）
    ///
    /// 未识别的后缀返回 None，调用方静默跳过
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "epub" => Some(SourceKind::Epub),
            "txt" => Some(SourceKind::PlainText),
            _ => None,
        }
    }
}

/// 待持久化的章节（生成管线的输出）
#[derive(Debug, Clone, PartialEq)]
pub struct DraftChapter {
    /// 章节标题（提取的标题或合成的 "Chapter {n}" / "Part {k}"）
    pub title: String,
    /// 章节正文（HTML 片段）
    pub body: String,
    /// 排序键，在小说内唯一且从 1 起递增
    pub order_key: i64,
    /// 源书中的原始章节编号（与存储顺序不一致时使用）
    pub source_index: Option<f64>,
}
