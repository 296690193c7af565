// ==========================================
// 推文审核系统 - Schema 迁移层
// ==========================================
// 职责: 版本登记 / 增量迁移 / 运维工具（状态、备份）
// 版本表: database_version（单行）
// ==========================================

pub mod admin;
pub mod ddl;
pub mod runner;

// 重导出
pub use admin::{backup_database, database_status, BackupError, DatabaseStatus};
pub use ddl::{MigrationStep, MIGRATION_STEPS};
pub use runner::{ensure_schema, MigrationError, MigrationOutcome, MigrationRunner};
