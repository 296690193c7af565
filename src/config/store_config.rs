// ==========================================
// 推文审核系统 - 存储配置
// ==========================================
// 职责: 解析数据库路径 / busy_timeout / 备份目录
// 来源: 环境变量 > DATABASE_URL > 用户数据目录 > 当前目录
// ==========================================

use crate::db::{DEFAULT_BUSY_TIMEOUT_MS, IN_MEMORY_PATH};
use std::path::PathBuf;

/// 环境变量键
pub mod env_keys {
    pub const DB_PATH: &str = "TWEET_REVIEW_DB_PATH";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const BUSY_TIMEOUT_MS: &str = "TWEET_REVIEW_BUSY_TIMEOUT_MS";
    pub const BACKUP_DIR: &str = "TWEET_REVIEW_BACKUP_DIR";
}

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "tweets.db";

const SQLITE_URL_PREFIX: &str = "sqlite:///";

// ==========================================
// StoreConfig - 存储配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// 数据库文件路径（`:memory:` 表示内存库）
    pub db_path: String,
    /// busy_timeout（毫秒）
    pub busy_timeout_ms: u64,
    /// 备份目录（None 时使用数据库所在目录）
    pub backup_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// 使用指定路径创建配置
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            backup_dir: None,
        }
    }

    /// 内存库配置（测试用）
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_PATH)
    }

    /// 从进程环境变量加载
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试注入，避免并行测试修改全局环境变量）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = non_empty(env_keys::DB_PATH)
            .or_else(|| non_empty(env_keys::DATABASE_URL).and_then(|url| parse_sqlite_url(&url)))
            .unwrap_or_else(get_default_db_path);

        let busy_timeout_ms = match non_empty(env_keys::BUSY_TIMEOUT_MS) {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!("{} 不是合法整数: {}，使用默认值", env_keys::BUSY_TIMEOUT_MS, raw);
                DEFAULT_BUSY_TIMEOUT_MS
            }),
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Self {
            db_path,
            busy_timeout_ms,
            backup_dir: non_empty(env_keys::BACKUP_DIR).map(PathBuf::from),
        }
    }

    /// 是否为内存库
    pub fn is_in_memory(&self) -> bool {
        self.db_path == IN_MEMORY_PATH
    }

    /// 备份目录：显式配置优先，否则为数据库文件所在目录
    pub fn resolved_backup_dir(&self) -> PathBuf {
        if let Some(dir) = &self.backup_dir {
            return dir.clone();
        }
        PathBuf::from(&self.db_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// 解析 `sqlite:///<path>` 形式的 DATABASE_URL
///
/// 非 sqlite 的 URL 返回 None（本存储层只支持 SQLite）
pub fn parse_sqlite_url(url: &str) -> Option<String> {
    let path = url.strip_prefix(SQLITE_URL_PREFIX)?;
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

/// 获取默认数据库路径
///
/// 优先使用用户数据目录，获取失败时回退到当前目录
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from(".").join(DEFAULT_DB_FILE);

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("tweet-review");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DEFAULT_DB_FILE);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_db_path_wins() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (env_keys::DB_PATH, "/tmp/a.db"),
            (env_keys::DATABASE_URL, "sqlite:////tmp/b.db"),
        ]));
        assert_eq!(config.db_path, "/tmp/a.db");
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
    }

    #[test]
    fn test_database_url_sqlite() {
        let config = StoreConfig::from_lookup(lookup_from(&[(
            env_keys::DATABASE_URL,
            "sqlite:///data/tweets.db",
        )]));
        assert_eq!(config.db_path, "data/tweets.db");
        assert_eq!(config.resolved_backup_dir(), PathBuf::from("data"));
    }

    #[test]
    fn test_non_sqlite_url_is_ignored() {
        assert_eq!(parse_sqlite_url("postgres://u:p@host/db"), None);
        assert_eq!(parse_sqlite_url("sqlite:///"), None);
    }

    #[test]
    fn test_busy_timeout_and_backup_dir() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (env_keys::DB_PATH, "tweets.db"),
            (env_keys::BUSY_TIMEOUT_MS, "250"),
            (env_keys::BACKUP_DIR, "/var/backups"),
        ]));
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.resolved_backup_dir(), PathBuf::from("/var/backups"));

        let bad = StoreConfig::from_lookup(lookup_from(&[
            (env_keys::DB_PATH, "tweets.db"),
            (env_keys::BUSY_TIMEOUT_MS, "soon"),
        ]));
        assert_eq!(bad.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(bad.resolved_backup_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_in_memory() {
        assert!(StoreConfig::in_memory().is_in_memory());
        assert!(!StoreConfig::new("x.db").is_in_memory());
    }
}
