//! EPUB Reader - EbookReaderPort 的 epub crate 实现
//!
//! 打开 zip 容器，读取 OPF 元数据，并按 spine 顺序遍历文档条目。
//! 解析是同步的（scraper 的 DOM 不是 Send），放在 spawn_blocking 里执行。

use async_trait::async_trait;
use epub::doc::EpubDoc;
use std::path::{Path, PathBuf};

use crate::application::ports::{ChapterScan, EbookReaderPort, IngestError};
use crate::domain::ingest::{
    chapter_from_markup, clean_author, genre_from_subjects, strip_tags, BookMetadata, DraftChapter,
};

/// epub crate 适配器
pub struct EpubSourceReader;

impl EpubSourceReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EpubSourceReader {
    fn default() -> Self {
        Self::new()
    }
}

/// 同步提取元数据；容器打不开时返回空结果
fn extract_metadata(path: &Path) -> BookMetadata {
    let doc = match EpubDoc::new(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to open ebook for metadata");
            return BookMetadata::default();
        }
    };

    let title = doc
        .mdata("title")
        .map(|t| t.value.trim().to_string())
        .filter(|t| !t.is_empty());
    let author = doc.mdata("creator").and_then(|c| clean_author(&c.value));
    let synopsis = doc
        .mdata("description")
        .map(|d| strip_tags(&d.value).trim().to_string())
        .filter(|d| !d.is_empty());
    let subjects: Vec<String> = doc
        .metadata
        .iter()
        .filter(|m| m.property == "subject")
        .map(|m| m.value.clone())
        .collect();
    let genre = genre_from_subjects(&subjects);

    BookMetadata {
        title,
        author,
        synopsis,
        genre,
    }
}

/// 同步遍历 spine，生成章节序列
///
/// 两个独立的计数器：
/// - `seen` 只对文档条目计数，用于合成 "Chapter {n}" 标题；
///   spine 中的封面图、样式表等不占序号
/// - `order_key` 只在发出章节时前进，保证排序键连续
fn walk_spine(path: &Path, min_body_chars: usize) -> Result<ChapterScan, IngestError> {
    let mut doc =
        EpubDoc::new(path).map_err(|e| IngestError::UnreadableSource(e.to_string()))?;

    let mut chapters = Vec::new();
    let mut seen = 0usize;
    let mut order_key = 1i64;
    let mut error = None;

    loop {
        let is_document = doc
            .get_current_mime()
            .is_some_and(|mime| mime.contains("html"));
        if is_document {
            seen += 1;
            match doc.get_current_str() {
                Some((content, _)) => {
                    if let Some((title, body)) =
                        chapter_from_markup(&content, seen, min_body_chars)
                    {
                        chapters.push(DraftChapter {
                            title,
                            body,
                            order_key,
                            source_index: None,
                        });
                        order_key += 1;
                    }
                }
                None => {
                    // 文档条目读取失败：保留已发出的章节，记下错误
                    error = Some(format!("entry {}: unreadable document", seen));
                    break;
                }
            }
        }

        if !doc.go_next() {
            break;
        }
    }

    Ok(ChapterScan { chapters, error })
}

#[async_trait]
impl EbookReaderPort for EpubSourceReader {
    async fn read_metadata(&self, path: &Path) -> BookMetadata {
        let path: PathBuf = path.to_path_buf();
        match tokio::task::spawn_blocking(move || extract_metadata(&path)).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(error = %e, "Metadata extraction task failed");
                BookMetadata::default()
            }
        }
    }

    async fn scan_chapters(
        &self,
        path: &Path,
        min_body_chars: usize,
    ) -> Result<ChapterScan, IngestError> {
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || walk_spine(&path, min_body_chars))
            .await
            .map_err(|e| IngestError::IoError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

    const XHTML: &str = "application/xhtml+xml";

    fn ext_for(media_type: &str) -> &'static str {
        if media_type.contains("html") {
            "xhtml"
        } else {
            "svg"
        }
    }

    /// 组装一个最小的 EPUB 容器，spine 条目为 (media-type, 内容) 对
    fn write_epub(path: &Path, metadata_xml: &str, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);

        zip.start_file(
            "mimetype",
            FileOptions::default().compression_method(zip::CompressionMethod::Stored),
        )
        .unwrap();
        zip.write_all(b"application/epub+zip").unwrap();

        zip.start_file("META-INF/container.xml", FileOptions::default())
            .unwrap();
        zip.write_all(CONTAINER_XML.as_bytes()).unwrap();

        let manifest: String = entries
            .iter()
            .enumerate()
            .map(|(i, (media_type, _))| {
                let n = i + 1;
                let ext = ext_for(media_type);
                format!(r#"<item id="it{n}" href="entry_{n}.{ext}" media-type="{media_type}"/>"#)
            })
            .collect();
        let spine: String = (1..=entries.len())
            .map(|i| format!(r#"<itemref idref="it{i}"/>"#))
            .collect();
        let opf = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="uid" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:identifier id="uid">urn:uuid:00000000-0000-0000-0000-000000000000</dc:identifier>
    {metadata_xml}
  </metadata>
  <manifest>{manifest}</manifest>
  <spine>{spine}</spine>
</package>"#
        );
        zip.start_file("OEBPS/content.opf", FileOptions::default())
            .unwrap();
        zip.write_all(opf.as_bytes()).unwrap();

        for (i, (media_type, body)) in entries.iter().enumerate() {
            zip.start_file(
                format!("OEBPS/entry_{}.{}", i + 1, ext_for(media_type)),
                FileOptions::default(),
            )
            .unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }

    fn long_paragraphs() -> String {
        format!("<p>{}</p>", "word ".repeat(60))
    }

    #[tokio::test]
    async fn test_metadata_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        let chapter = format!(
            "<html><body><h1>One</h1>{}</body></html>",
            long_paragraphs()
        );
        write_epub(
            &path,
            r#"<dc:title>The Long Road</dc:title>
               <dc:creator>Jane Doe</dc:creator>
               <dc:description>&lt;p&gt;A tale of &lt;b&gt;roads&lt;/b&gt;.&lt;/p&gt;</dc:description>
               <dc:subject>Fantasy</dc:subject>
               <dc:subject>Adventure</dc:subject>"#,
            &[(XHTML, chapter.as_str())],
        );

        let reader = EpubSourceReader::new();
        let metadata = reader.read_metadata(&path).await;

        assert_eq!(metadata.title.as_deref(), Some("The Long Road"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Doe"));
        assert_eq!(metadata.synopsis.as_deref(), Some("A tale of roads."));
        assert_eq!(metadata.genre.as_deref(), Some("Fantasy, Adventure"));
    }

    #[tokio::test]
    async fn test_zero_creator_treated_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        let chapter = format!("<html><body>{}</body></html>", long_paragraphs());
        write_epub(
            &path,
            r#"<dc:title>T</dc:title><dc:creator>0</dc:creator>"#,
            &[(XHTML, chapter.as_str())],
        );

        let reader = EpubSourceReader::new();
        let metadata = reader.read_metadata(&path).await;

        assert_eq!(metadata.author, None);
    }

    #[tokio::test]
    async fn test_metadata_from_missing_file_is_empty() {
        let reader = EpubSourceReader::new();
        let metadata = reader.read_metadata(Path::new("does/not/exist.epub")).await;
        assert!(metadata.is_empty());
    }

    #[tokio::test]
    async fn test_spine_walk_skips_short_entries_and_numbers_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        let first = format!(
            "<html><body><h1>Prologue</h1>{}</body></html>",
            long_paragraphs()
        );
        let third = format!("<html><body>{}</body></html>", long_paragraphs());
        write_epub(
            &path,
            r#"<dc:title>T</dc:title>"#,
            &[
                // 条目 1：有标题，正文够长 -> "Prologue"，order 1
                (XHTML, first.as_str()),
                // 条目 2：正文过短 -> 丢弃，不占用 order key
                (XHTML, "<html><body><p>cover</p></body></html>"),
                // 条目 3：无标题，正文够长 -> "Chapter 3"（按条目序号），order 2
                (XHTML, third.as_str()),
            ],
        );

        let reader = EpubSourceReader::new();
        let scan = reader.scan_chapters(&path, 100).await.unwrap();

        assert!(scan.error.is_none());
        assert_eq!(scan.chapters.len(), 2);
        assert_eq!(scan.chapters[0].title, "Prologue");
        assert_eq!(scan.chapters[0].order_key, 1);
        assert_eq!(scan.chapters[1].title, "Chapter 3");
        assert_eq!(scan.chapters[1].order_key, 2);
    }

    #[tokio::test]
    async fn test_spine_cover_image_does_not_consume_chapter_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        let body = format!("<html><body>{}</body></html>", long_paragraphs());
        write_epub(
            &path,
            r#"<dc:title>T</dc:title>"#,
            &[
                // spine 里的封面图不参与文档条目计数
                (
                    "image/svg+xml",
                    r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#,
                ),
                // 第一个文档条目无标题 -> 合成 "Chapter 1"
                (XHTML, body.as_str()),
            ],
        );

        let reader = EpubSourceReader::new();
        let scan = reader.scan_chapters(&path, 100).await.unwrap();

        assert!(scan.error.is_none());
        assert_eq!(scan.chapters.len(), 1);
        assert_eq!(scan.chapters[0].title, "Chapter 1");
        assert_eq!(scan.chapters[0].order_key, 1);
    }

    #[tokio::test]
    async fn test_scan_unreadable_container_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.epub");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let reader = EpubSourceReader::new();
        let result = reader.scan_chapters(&path, 100).await;

        assert!(matches!(result, Err(IngestError::UnreadableSource(_))));
    }
}
