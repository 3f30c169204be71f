//! Novel Commands

use std::path::PathBuf;
use uuid::Uuid;

use crate::application::ports::NovelStatus;

/// 创建小说命令（字段可留空，等待元数据自动填充）
#[derive(Debug, Clone)]
pub struct CreateNovel {
    pub title: Option<String>,
    pub author: Option<String>,
    pub alternative_title: Option<String>,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
    pub status: NovelStatus,
}

/// 更新小说字段命令（None 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct UpdateNovel {
    pub novel_id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub alternative_title: Option<String>,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
    pub status: Option<NovelStatus>,
}

/// 删除小说命令
#[derive(Debug, Clone)]
pub struct DeleteNovel {
    pub novel_id: Uuid,
}

/// 章节生成命令
///
/// `new_source_path` 为 Some 时先把该路径记到小说上（源文件刚更换），
/// 再从小说当前的源文件重新生成整个章节集
#[derive(Debug, Clone)]
pub struct IngestNovelSource {
    pub novel_id: Uuid,
    pub new_source_path: Option<PathBuf>,
}

/// 评分命令
#[derive(Debug, Clone)]
pub struct RateNovel {
    pub novel_id: Uuid,
    pub user_id: i64,
    pub score: i64,
}
