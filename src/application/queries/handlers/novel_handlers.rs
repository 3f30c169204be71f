//! Novel Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterNeighbors, ChapterRecord, ChapterRepositoryPort, ChapterSummary, NovelFilter,
    NovelRecord, NovelRepositoryPort, NovelSummary, VoteRepositoryPort,
};
use crate::application::queries::{GetChapter, GetNovel, ListChapters, ListNovels};

/// 平均分保留一位小数
fn round_rating(avg: f64) -> f64 {
    (avg * 10.0).round() / 10.0
}

// ============================================================================
// ListNovels
// ============================================================================

/// 小说列表页
#[derive(Debug, Clone)]
pub struct NovelPage {
    pub novels: Vec<NovelSummary>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

/// ListNovels Handler - 分页列出小说
pub struct ListNovelsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    page_size: usize,
}

impl ListNovelsHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>, page_size: usize) -> Self {
        Self {
            novel_repo,
            page_size,
        }
    }

    pub async fn handle(&self, query: ListNovels) -> Result<NovelPage, ApplicationError> {
        let page = query.page.max(1);
        let filter = NovelFilter {
            query: query.query.filter(|q| !q.trim().is_empty()),
            genre: query.genre.filter(|g| !g.trim().is_empty()),
            offset: (page - 1) * self.page_size,
            limit: self.page_size,
        };

        let (novels, total) = self.novel_repo.find_page(&filter).await?;
        let page_count = total.div_ceil(self.page_size);

        Ok(NovelPage {
            novels,
            total,
            page,
            page_count,
        })
    }
}

// ============================================================================
// GetNovel
// ============================================================================

/// 小说详情（含派生字段）
#[derive(Debug, Clone)]
pub struct NovelDetail {
    pub novel: NovelRecord,
    /// 投票平均分（一位小数），无投票为 0.0
    pub rating: f64,
    pub chapter_count: usize,
}

/// GetNovel Handler - 小说详情
pub struct GetNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    vote_repo: Arc<dyn VoteRepositoryPort>,
}

impl GetNovelHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        vote_repo: Arc<dyn VoteRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
            vote_repo,
        }
    }

    pub async fn handle(&self, query: GetNovel) -> Result<NovelDetail, ApplicationError> {
        let novel = self
            .novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        let rating = self
            .vote_repo
            .average_for_novel(query.novel_id)
            .await?
            .map(round_rating)
            .unwrap_or(0.0);
        let chapter_count = self.chapter_repo.count_by_novel(query.novel_id).await?;

        Ok(NovelDetail {
            novel,
            rating,
            chapter_count,
        })
    }
}

// ============================================================================
// GetChapter
// ============================================================================

/// 章节正文与阅读导航
#[derive(Debug, Clone)]
pub struct ChapterDetail {
    pub chapter: ChapterRecord,
    pub novel_title: String,
    pub neighbors: ChapterNeighbors,
}

/// GetChapter Handler - 章节正文（含前后章节 ID）
pub struct GetChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterDetail, ApplicationError> {
        let chapter = self
            .chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))?;

        let novel = self
            .novel_repo
            .find_by_id(chapter.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", chapter.novel_id))?;

        let neighbors = self
            .chapter_repo
            .neighbors(chapter.novel_id, chapter.order_key)
            .await?;

        Ok(ChapterDetail {
            chapter,
            novel_title: novel.title,
            neighbors,
        })
    }
}

// ============================================================================
// ListChapters
// ============================================================================

/// ListChapters Handler - 小说目录（按 order key 升序，不含正文）
pub struct ListChaptersHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(
        &self,
        query: ListChapters,
    ) -> Result<Vec<ChapterSummary>, ApplicationError> {
        self.novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        Ok(self.chapter_repo.list_by_novel(query.novel_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rounds_to_one_decimal() {
        assert_eq!(round_rating(4.25), 4.3);
        assert_eq!(round_rating(3.333333), 3.3);
        assert_eq!(round_rating(5.0), 5.0);
    }
}
