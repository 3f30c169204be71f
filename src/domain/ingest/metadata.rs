//! EPUB 元数据清洗
//!
//! 从容器声明的元数据字段推导小说描述信息。字段缺失不是错误：
//! 结果中的 None 表示"未找到，调用方保留现有值"。

use once_cell::sync::Lazy;
use regex::Regex;

/// 非递归单遍的标签匹配（`<...>`）
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").expect("static pattern"));

/// genre 字段的最大长度（超出截断为 97 字符 + "..."）
const MAX_GENRE_LEN: usize = 100;

/// 从容器提取的元数据（瞬态，不单独持久化）
///
/// 编排器消费一次用于填充小说的空白字段，然后丢弃
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
}

impl BookMetadata {
    /// 是否一个字段都没提取到
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.synopsis.is_none()
            && self.genre.is_none()
    }
}

/// 清洗 creator 字段
///
/// 畸形源文件中观察到的占位值：字面量 "0"。
/// 该值视为缺失，让调用方保留默认作者。
pub fn clean_author(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "0" {
        None
    } else {
        Some(raw.to_string())
    }
}

/// 去除描述中的标记标签
///
/// 标签是任何匹配 `<...>` 的子串；单遍非递归替换
pub fn strip_tags(raw: &str) -> String {
    TAG_PATTERN.replace_all(raw, "").into_owned()
}

/// 将 subject 条目合并为 genre 字符串
///
/// 逗号连接，超出 100 字符时截断为 97 + "..."
pub fn genre_from_subjects(subjects: &[String]) -> Option<String> {
    if subjects.is_empty() {
        return None;
    }

    let joined = subjects.join(", ");
    if joined.chars().count() > MAX_GENRE_LEN {
        let truncated: String = joined.chars().take(MAX_GENRE_LEN - 3).collect();
        Some(format!("{}...", truncated))
    } else {
        Some(joined)
    }
}
