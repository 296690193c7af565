// ==========================================
// 推文审核系统 - 配置层
// ==========================================
// 职责: 存储配置解析（数据库路径 / 超时 / 备份目录）
// 来源: 环境变量，无全局懒加载状态
// ==========================================

pub mod store_config;

// 重导出核心配置
pub use store_config::{env_keys, get_default_db_path, parse_sqlite_url, StoreConfig};
