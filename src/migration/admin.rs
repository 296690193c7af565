// ==========================================
// 推文审核系统 - 数据库运维工具
// ==========================================
// 职责: 数据库状态查询 / 文件备份
// 说明: 备份为纯文件拷贝，只适用于文件型 SQLite 库
// ==========================================

use crate::config::StoreConfig;
use crate::db::{list_tables, read_schema_version, CURRENT_SCHEMA_VERSION};
use chrono::Local;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

// ==========================================
// DatabaseStatus - 数据库状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatus {
    /// connected / error
    pub status: String,
    pub version: i64,
    pub target_version: i64,
    pub needs_migration: bool,
    pub tables: Vec<String>,
    pub database_path: String,
    pub message: String,
}

/// 查询数据库状态（不返回错误，错误写入 status/message）
pub fn database_status(conn: &Arc<Mutex<Connection>>, config: &StoreConfig) -> DatabaseStatus {
    let probe = conn
        .lock()
        .map_err(|e| e.to_string())
        .and_then(|guard| {
            let version = read_schema_version(&guard).map_err(|e| e.to_string())?;
            let tables = list_tables(&guard).map_err(|e| e.to_string())?;
            Ok((version, tables))
        });

    match probe {
        Ok((version, tables)) => DatabaseStatus {
            status: "connected".to_string(),
            version,
            target_version: CURRENT_SCHEMA_VERSION,
            needs_migration: version != CURRENT_SCHEMA_VERSION,
            tables,
            database_path: config.db_path.clone(),
            message: format!("Database version {} of {}", version, CURRENT_SCHEMA_VERSION),
        },
        Err(e) => {
            tracing::error!("读取数据库状态失败: {}", e);
            DatabaseStatus {
                status: "error".to_string(),
                version: 0,
                target_version: CURRENT_SCHEMA_VERSION,
                needs_migration: true,
                tables: Vec::new(),
                database_path: config.db_path.clone(),
                message: format!("Database error: {}", e),
            }
        }
    }
}

// ==========================================
// 备份
// ==========================================

/// 备份错误
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("内存库不支持文件备份")]
    InMemoryStore,

    #[error("数据库文件不存在: {0}")]
    DatabaseFileMissing(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("备份文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 默认备份文件名: tweets_backup_YYYYmmdd_HHMMSS.db
pub fn default_backup_file_name() -> String {
    format!("tweets_backup_{}.db", Local::now().format("%Y%m%d_%H%M%S"))
}

/// 备份数据库文件
///
/// # 参数
/// - `dest`: 目标路径；None 时写入备份目录下的默认文件名
///
/// # 说明
/// 拷贝期间持有连接锁，保证没有进行中的写事务
pub fn backup_database(
    conn: &Arc<Mutex<Connection>>,
    config: &StoreConfig,
    dest: Option<&Path>,
) -> Result<PathBuf, BackupError> {
    if config.is_in_memory() {
        return Err(BackupError::InMemoryStore);
    }

    let source = PathBuf::from(&config.db_path);
    if !source.exists() {
        return Err(BackupError::DatabaseFileMissing(config.db_path.clone()));
    }

    let target = match dest {
        Some(p) => p.to_path_buf(),
        None => {
            let dir = config.resolved_backup_dir();
            std::fs::create_dir_all(&dir)?;
            dir.join(default_backup_file_name())
        }
    };

    let _guard = conn
        .lock()
        .map_err(|e| BackupError::LockError(e.to_string()))?;
    let bytes = std::fs::copy(&source, &target)?;

    tracing::info!(
        source = %source.display(),
        target = %target.display(),
        bytes,
        "数据库已备份"
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_sqlite_connection, DEFAULT_BUSY_TIMEOUT_MS, IN_MEMORY_PATH};
    use crate::migration::runner::ensure_schema;

    #[test]
    fn test_status_reports_version_and_tables() {
        let mut raw = open_sqlite_connection(IN_MEMORY_PATH, DEFAULT_BUSY_TIMEOUT_MS).unwrap();
        ensure_schema(&mut raw, CURRENT_SCHEMA_VERSION).unwrap();
        let conn = Arc::new(Mutex::new(raw));

        let status = database_status(&conn, &StoreConfig::in_memory());
        assert_eq!(status.status, "connected");
        assert_eq!(status.version, CURRENT_SCHEMA_VERSION);
        assert!(!status.needs_migration);
        assert!(status.tables.contains(&"scraped_tweets".to_string()));
    }

    #[test]
    fn test_status_on_empty_store_needs_migration() {
        let raw = open_sqlite_connection(IN_MEMORY_PATH, DEFAULT_BUSY_TIMEOUT_MS).unwrap();
        let conn = Arc::new(Mutex::new(raw));

        let status = database_status(&conn, &StoreConfig::in_memory());
        assert_eq!(status.version, 0);
        assert!(status.needs_migration);
        assert!(status.tables.is_empty());
    }

    #[test]
    fn test_backup_rejects_in_memory() {
        let raw = open_sqlite_connection(IN_MEMORY_PATH, DEFAULT_BUSY_TIMEOUT_MS).unwrap();
        let conn = Arc::new(Mutex::new(raw));

        let result = backup_database(&conn, &StoreConfig::in_memory(), None);
        assert!(matches!(result, Err(BackupError::InMemoryStore)));
    }

    #[test]
    fn test_default_backup_file_name() {
        let name = default_backup_file_name();
        assert!(name.starts_with("tweets_backup_"));
        assert!(name.ends_with(".db"));
    }
}
