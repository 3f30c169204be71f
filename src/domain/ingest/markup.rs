//! Markup → 章节转换
//!
//! 对 EPUB 容器中单个文档条目的 HTML 做两件事：
//! 1. 标题推导：文档中第一个 h1/h2/h3 的文本；没有则合成 "Chapter {n}"，
//!    n 是对所有已遍历文档条目的 1 起计数（与 order key 无关）
//! 2. 正文推导：所有 `<p>` 元素的序列化标记按文档顺序拼接，不加分隔符
//!
//! 正文字符数不超过阈值的条目（封面页、版权页）被丢弃，不占用 order key。

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3").expect("static selector"));

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("static selector"));

/// 从单个文档条目解析出的原始内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupEntry {
    /// 第一个 h1/h2/h3 的文本（去除首尾空白）；文档中没有标题元素时为 None
    pub heading: Option<String>,
    /// 所有段落的序列化标记拼接
    pub body: String,
}

impl MarkupEntry {
    /// 解析一个文档条目的 HTML
    pub fn parse(markup: &str) -> Self {
        let document = Html::parse_document(markup);

        let heading = document
            .select(&HEADING_SELECTOR)
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string());

        let body: String = document
            .select(&PARAGRAPH_SELECTOR)
            .map(|p| p.html())
            .collect();

        Self { heading, body }
    }

    /// 正文字符数（按 Unicode 标量计）
    pub fn body_chars(&self) -> usize {
        self.body.chars().count()
    }
}

/// 将一个文档条目转换为章节候选
///
/// - `fallback_number`: 合成标题用的条目序号（对已遍历的文档条目 1 起计数）
/// - `min_body_chars`: 正文长度门限，**严格大于**才发出（101 发出，100 不发出）
///
/// 返回 None 表示该条目被丢弃。
pub fn chapter_from_markup(
    markup: &str,
    fallback_number: usize,
    min_body_chars: usize,
) -> Option<(String, String)> {
    let entry = MarkupEntry::parse(markup);

    if entry.body_chars() <= min_body_chars {
        return None;
    }

    let title = entry
        .heading
        .unwrap_or_else(|| format!("Chapter {}", fallback_number));

    Some((title, entry.body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_first_match_wins() {
        let markup = "<html><body><h2>Second Level</h2><h1>First Level</h1></body></html>";
        let entry = MarkupEntry::parse(markup);
        // 文档顺序上的第一个标题，而非最高级别
        assert_eq!(entry.heading.as_deref(), Some("Second Level"));
    }

    #[test]
    fn test_heading_missing() {
        let entry = MarkupEntry::parse("<html><body><p>no heading here</p></body></html>");
        assert_eq!(entry.heading, None);
    }

    #[test]
    fn test_heading_text_is_trimmed() {
        let entry = MarkupEntry::parse("<html><body><h1>  Prologue \n</h1></body></html>");
        assert_eq!(entry.heading.as_deref(), Some("Prologue"));
    }

    #[test]
    fn test_body_concatenates_paragraph_markup() {
        let markup = "<html><body><h1>T</h1><p>one</p><div><p>two</p></div></body></html>";
        let entry = MarkupEntry::parse(markup);
        assert_eq!(entry.body, "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_body_ignores_non_paragraph_text() {
        let markup = "<html><body><div>stray text</div><p>kept</p></body></html>";
        let entry = MarkupEntry::parse(markup);
        assert_eq!(entry.body, "<p>kept</p>");
    }

    #[test]
    fn test_emit_boundary_exactly_100_drops() {
        // "<p>" + 93 个 'a' + "</p>" = 100 字符
        let markup = format!("<html><body><p>{}</p></body></html>", "a".repeat(93));
        assert!(chapter_from_markup(&markup, 1, 100).is_none());
    }

    #[test]
    fn test_emit_boundary_exactly_101_emits() {
        // "<p>" + 94 个 'a' + "</p>" = 101 字符
        let markup = format!("<html><body><p>{}</p></body></html>", "a".repeat(94));
        let (title, body) = chapter_from_markup(&markup, 7, 100).unwrap();
        assert_eq!(title, "Chapter 7");
        assert_eq!(body.chars().count(), 101);
    }

    #[test]
    fn test_heading_preferred_over_fallback() {
        let markup = format!(
            "<html><body><h1>Prologue</h1><p>{}</p></body></html>",
            "a".repeat(150)
        );
        let (title, _) = chapter_from_markup(&markup, 3, 100).unwrap();
        assert_eq!(title, "Prologue");
    }
}
