// ==========================================
// 推文审核系统 - 应用状态
// ==========================================
// 职责: 打开共享连接、执行 schema 迁移、装配仓储与 API
// 说明: 显式构造，每个进程一份，不使用全局单例
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{AdminApi, ReviewApi, ScrapedApi};
use crate::config::StoreConfig;
use crate::db::open_sqlite_connection;
use crate::migration::MigrationRunner;
use crate::repository::{CampaignRepository, ScrapedTweetRepository};

/// 应用状态
///
/// 包含所有 API 实例和共享连接
pub struct AppState {
    /// 存储配置
    pub config: StoreConfig,

    /// 共享数据库连接
    pub conn: Arc<Mutex<Connection>>,

    /// 活动审核 API
    pub review_api: Arc<ReviewApi>,

    /// 抓取推文 API
    pub scraped_api: Arc<ScrapedApi>,

    /// 运维 API
    pub admin_api: Arc<AdminApi>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// # 说明
    /// 1. 打开数据库（文件库会先创建父目录）
    /// 2. 迁移到当前 schema 版本
    /// 3. 创建仓储与 API
    ///
    /// # 返回
    /// - Err(String): 初始化错误（连接或迁移失败）
    pub fn new(config: StoreConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        if !config.is_in_memory() {
            if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| format!("无法创建数据库目录: {}", e))?;
                }
            }
        }

        let conn = open_sqlite_connection(&config.db_path, config.busy_timeout_ms)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let outcome = MigrationRunner::new(conn.clone())
            .ensure_latest()
            .map_err(|e| format!("数据库迁移失败: {}", e))?;
        if outcome.is_noop() {
            tracing::info!(version = outcome.to_version, "数据库已是最新版本");
        } else {
            tracing::info!(
                from = outcome.from_version,
                to = outcome.to_version,
                fresh = outcome.fresh,
                "数据库迁移完成"
            );
        }

        // ==========================================
        // 初始化 Repository 层
        // ==========================================
        let campaign_repo = Arc::new(CampaignRepository::new(conn.clone()));
        let scraped_repo = Arc::new(ScrapedTweetRepository::new(conn.clone()));

        // ==========================================
        // 初始化 API 层
        // ==========================================
        let review_api = Arc::new(ReviewApi::new(campaign_repo));
        let scraped_api = Arc::new(ScrapedApi::new(scraped_repo));
        let admin_api = Arc::new(AdminApi::new(conn.clone(), config.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            config,
            conn,
            review_api,
            scraped_api,
            admin_api,
        })
    }

    /// 内存库实例（测试用）
    pub fn in_memory() -> Result<Self, String> {
        Self::new(StoreConfig::in_memory())
    }
}
