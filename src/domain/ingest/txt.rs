//! 纯文本分章
//!
//! 将按行分隔的 TXT 切成固定行数的批次，每批合成一章：
//! 标题 "Part {k}"，order key 即批次序号 k（1 起）。

use super::DraftChapter;

/// 宽容解码：无法解码的字节序列被丢弃而非报错
pub fn decode_plain_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// 将纯文本切成章节
///
/// 按换行分割，去除每行首尾空白，丢弃空白行；
/// 非空行按 `lines_per_chapter` 行一批，每批包装为一章，
/// 正文为每行包在 `<p>...</p>` 中的无分隔符拼接。
pub fn chunk_plain_text(text: &str, lines_per_chapter: usize) -> Vec<DraftChapter> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .chunks(lines_per_chapter)
        .enumerate()
        .map(|(i, chunk)| {
            let number = (i + 1) as i64;
            let body: String = chunk.iter().map(|line| format!("<p>{}</p>", line)).collect();
            DraftChapter {
                title: format!("Part {}", i + 1),
                body,
                order_key: number,
                source_index: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_drops_invalid_bytes() {
        let bytes = b"hello \xff\xfe world";
        assert_eq!(decode_plain_text(bytes), "hello  world");
    }

    #[test]
    fn test_decode_plain_utf8_passthrough() {
        assert_eq!(decode_plain_text("宁静致远".as_bytes()), "宁静致远");
    }

    #[test]
    fn test_chunk_counts_ceil_division() {
        // 120 个非空行，每章 50 行 → 3 章
        let text = (0..120).map(|i| format!("line {}\n", i)).collect::<String>();
        let chapters = chunk_plain_text(&text, 50);
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].title, "Part 1");
        assert_eq!(chapters[2].title, "Part 3");

        let orders: Vec<i64> = chapters.iter().map(|c| c.order_key).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_chunk_skips_blank_lines_and_trims() {
        let text = "  first  \n\n   \n\tsecond\n";
        let chapters = chunk_plain_text(text, 50);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].body, "<p>first</p><p>second</p>");
    }

    #[test]
    fn test_chunk_exact_multiple() {
        let text = (0..100).map(|i| format!("l{}\n", i)).collect::<String>();
        let chapters = chunk_plain_text(&text, 50);
        assert_eq!(chapters.len(), 2);
    }

    #[test]
    fn test_chunk_empty_input() {
        assert!(chunk_plain_text("", 50).is_empty());
        assert!(chunk_plain_text("\n\n  \n", 50).is_empty());
    }

    #[test]
    fn test_chunk_handles_crlf() {
        let text = "one\r\ntwo\r\n";
        let chapters = chunk_plain_text(text, 50);
        assert_eq!(chapters[0].body, "<p>one</p><p>two</p>");
    }
}
