// ==========================================
// 推文审核系统 - 运维 API
// ==========================================
// 职责: Schema 迁移、数据库状态、备份
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::error::ApiResult;
use crate::config::StoreConfig;
use crate::db::CURRENT_SCHEMA_VERSION;
use crate::migration::{
    backup_database, database_status, DatabaseStatus, MigrationOutcome, MigrationRunner,
};

// ==========================================
// AdminApi - 运维 API
// ==========================================
pub struct AdminApi {
    conn: Arc<Mutex<Connection>>,
    config: StoreConfig,
}

impl AdminApi {
    /// 创建新的 AdminApi 实例
    pub fn new(conn: Arc<Mutex<Connection>>, config: StoreConfig) -> Self {
        Self { conn, config }
    }

    /// 迁移到指定版本
    pub fn ensure_schema(&self, target_version: i64) -> ApiResult<MigrationOutcome> {
        let outcome = MigrationRunner::new(self.conn.clone()).ensure_schema(target_version)?;
        Ok(outcome)
    }

    /// 强制执行迁移到当前代码版本
    pub fn force_migration(&self) -> ApiResult<MigrationOutcome> {
        tracing::info!(target_version = CURRENT_SCHEMA_VERSION, "强制执行 schema 迁移");
        self.ensure_schema(CURRENT_SCHEMA_VERSION)
    }

    /// 数据库状态（不返回错误）
    pub fn database_status(&self) -> DatabaseStatus {
        database_status(&self.conn, &self.config)
    }

    /// 备份数据库文件
    pub fn backup(&self, dest: Option<&Path>) -> ApiResult<PathBuf> {
        Ok(backup_database(&self.conn, &self.config, dest)?)
    }
}
