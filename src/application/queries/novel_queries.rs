//! Novel Queries

use uuid::Uuid;

/// 小说列表查询（分页、搜索、分类过滤）
#[derive(Debug, Clone, Default)]
pub struct ListNovels {
    /// 标题/作者子串搜索（不区分大小写）
    pub query: Option<String>,
    /// genre 精确匹配（不区分大小写）
    pub genre: Option<String>,
    /// 页码，从 1 起，越界返回空页
    pub page: usize,
}

/// 小说详情查询
#[derive(Debug, Clone)]
pub struct GetNovel {
    pub novel_id: Uuid,
}

/// 章节正文查询（含前后导航）
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: Uuid,
}

/// 小说目录查询
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub novel_id: Uuid,
}
