//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 章节生成配置
    #[serde(default)]
    pub ingest: IngestConfig,

    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            ingest: IngestConfig::default(),
            api: ApiConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/zennovel.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 上传的 EPUB/TXT 源文件存储目录
    #[serde(default = "default_sources_dir")]
    pub sources_dir: PathBuf,

    /// 封面图片存储目录
    #[serde(default = "default_covers_dir")]
    pub covers_dir: PathBuf,

    /// 上传文件最大大小（字节），默认 50MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_sources_dir() -> PathBuf {
    PathBuf::from("data/sources")
}

fn default_covers_dir() -> PathBuf {
    PathBuf::from("data/covers")
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024 // 50 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sources_dir: default_sources_dir(),
            covers_dir: default_covers_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 章节生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// EPUB 章节正文最小字符数
    /// 拼接后的段落标记长度不超过该值的条目（封面页、版权页）被丢弃
    #[serde(default = "default_min_body_chars")]
    pub min_body_chars: usize,

    /// TXT 导入时每章的段落行数
    #[serde(default = "default_lines_per_chapter")]
    pub lines_per_chapter: usize,
}

fn default_min_body_chars() -> usize {
    100
}

fn default_lines_per_chapter() -> usize {
    50
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_body_chars: default_min_body_chars(),
            lines_per_chapter: default_lines_per_chapter(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 小说列表默认每页条数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    12
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.database.path, "data/zennovel.db");
        assert_eq!(config.ingest.min_body_chars, 100);
        assert_eq!(config.ingest.lines_per_chapter, 50);
        assert_eq!(config.api.page_size, 12);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5070");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/zennovel.db?mode=rwc");
    }
}
