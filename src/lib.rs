// ==========================================
// 推文审核系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 推文审核应用的持久化与去重层
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 存储配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// Schema 迁移与运维
pub mod migration;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    BulkInsertReport, Campaign, CampaignPayload, CampaignWithTweets, CascadeDeleteResult,
    DuplicateCheck, RawScrapedRow, ScrapedTweet, ScrapedTweetQuery, ScrapedTweetStats,
    ScrapedTweetView, Tweet, TweetPayload, TweetStatus,
};

// 仓储
pub use repository::{CampaignRepository, RepositoryError, RepositoryResult, ScrapedTweetRepository};

// API
pub use api::{AdminApi, ApiError, ApiResult, ReviewApi, ScrapedApi};

// 应用
pub use app::AppState;
pub use config::StoreConfig;

// ==========================================
// 版本信息
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const SYSTEM_NAME: &str = "推文审核系统";
