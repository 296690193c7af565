// ==========================================
// 推文审核系统 - Schema 迁移执行器
// ==========================================
// 契约: ensure_schema(target) 把库带到恰好 target 版本
// - 当前 == 目标: 空操作
// - 当前 == 0（空库）: 直接按目标形态建表，记录版本
// - 否则: 按版本升序执行增量步骤（每步可重复执行），最后记录版本
// - 任一步骤失败: 整体回滚，库停留在上次记录的版本
// ==========================================

use crate::db::{column_exists, read_schema_version, table_exists, CURRENT_SCHEMA_VERSION};
use crate::migration::ddl::{
    step_for, CREATE_VERSION_TABLE, LATEST_SCHEMA, V1_BASE_TABLES, V2_SCRAPED_TWEETS_INDEXES,
    V2_SCRAPED_TWEETS_TABLE, V3_DISPLAY_NAME_COLUMN,
};
use chrono::Utc;
use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// 迁移错误
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("不支持降级: current={current}, target={target}")]
    Downgrade { current: i64, target: i64 },

    #[error("未知的目标版本: {target}（支持 1..={max}）")]
    UnknownTarget { target: i64, max: i64 },

    #[error("迁移步骤失败 (v{version}): {source}")]
    StepFailed {
        version: i64,
        #[source]
        source: rusqlite::Error,
    },

    #[error("数据库错误: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),
}

/// 迁移结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from_version: i64,
    pub to_version: i64,
    /// 实际执行的增量步骤版本号（空库建表时为空）
    pub applied_steps: Vec<i64>,
    /// 是否为空库一次性建表
    pub fresh: bool,
}

impl MigrationOutcome {
    /// 是否为空操作
    pub fn is_noop(&self) -> bool {
        !self.fresh && self.applied_steps.is_empty()
    }
}

// ==========================================
// MigrationRunner - 迁移执行器
// ==========================================
pub struct MigrationRunner {
    conn: Arc<Mutex<Connection>>,
}

impl MigrationRunner {
    /// 从共享连接创建
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 迁移到目标版本
    pub fn ensure_schema(&self, target_version: i64) -> Result<MigrationOutcome, MigrationError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| MigrationError::LockError(e.to_string()))?;
        ensure_schema(&mut conn, target_version)
    }

    /// 迁移到当前代码版本
    pub fn ensure_latest(&self) -> Result<MigrationOutcome, MigrationError> {
        self.ensure_schema(CURRENT_SCHEMA_VERSION)
    }

    /// 读取当前版本
    pub fn current_version(&self) -> Result<i64, MigrationError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| MigrationError::LockError(e.to_string()))?;
        Ok(read_schema_version(&conn)?)
    }
}

/// 在给定连接上迁移到目标版本
pub fn ensure_schema(
    conn: &mut Connection,
    target_version: i64,
) -> Result<MigrationOutcome, MigrationError> {
    if target_version < 1 || target_version > CURRENT_SCHEMA_VERSION {
        return Err(MigrationError::UnknownTarget {
            target: target_version,
            max: CURRENT_SCHEMA_VERSION,
        });
    }

    let current = read_schema_version(conn)?;
    tracing::info!(current, target = target_version, "检查数据库 schema 版本");

    if current == target_version {
        tracing::debug!("数据库已是目标版本");
        return Ok(MigrationOutcome {
            from_version: current,
            to_version: current,
            applied_steps: Vec::new(),
            fresh: false,
        });
    }

    if current > target_version {
        return Err(MigrationError::Downgrade {
            current,
            target: target_version,
        });
    }

    let tx = conn.transaction()?;

    let outcome = if current == 0 {
        tracing::info!("空库，按 v{} 形态直接建表", target_version);
        create_fresh(&tx, target_version)?;
        record_version(&tx, target_version, "Initial database creation")?;
        MigrationOutcome {
            from_version: 0,
            to_version: target_version,
            applied_steps: Vec::new(),
            fresh: true,
        }
    } else {
        let mut applied = Vec::new();
        for version in (current + 1)..=target_version {
            apply_step(&tx, version)?;
            applied.push(version);
        }

        let notes = applied
            .iter()
            .filter_map(|v| step_for(*v))
            .map(|s| s.notes)
            .collect::<Vec<_>>()
            .join("; ");
        record_version(&tx, target_version, &notes)?;

        MigrationOutcome {
            from_version: current,
            to_version: target_version,
            applied_steps: applied,
            fresh: false,
        }
    };

    // 提交失败时 tx 在 drop 时回滚
    tx.commit()?;

    tracing::info!(
        from = outcome.from_version,
        to = outcome.to_version,
        steps = ?outcome.applied_steps,
        "数据库迁移完成"
    );
    Ok(outcome)
}

/// 空库建表
fn create_fresh(tx: &Transaction<'_>, target_version: i64) -> Result<(), MigrationError> {
    if target_version == CURRENT_SCHEMA_VERSION {
        tx.execute_batch(LATEST_SCHEMA)
            .map_err(|source| MigrationError::StepFailed {
                version: target_version,
                source,
            })?;
        // 库中可能残留无版本记录的旧表（缺列），补齐
        let (table, column, ty) = V3_DISPLAY_NAME_COLUMN;
        ensure_column(tx, table, column, ty).map_err(|source| MigrationError::StepFailed {
            version: target_version,
            source,
        })?;
        return Ok(());
    }

    // 低于最新版本的目标: 依次回放步骤得到对应形态
    tx.execute_batch(CREATE_VERSION_TABLE)?;
    for version in 1..=target_version {
        apply_step(tx, version)?;
    }
    Ok(())
}

/// 执行单个增量步骤（可重复执行）
fn apply_step(tx: &Transaction<'_>, version: i64) -> Result<(), MigrationError> {
    let step = step_for(version).ok_or(MigrationError::UnknownTarget {
        target: version,
        max: CURRENT_SCHEMA_VERSION,
    })?;
    tracing::info!("执行迁移 v{}: {}", step.version, step.name);

    let wrap = |source: rusqlite::Error| MigrationError::StepFailed { version, source };

    match version {
        1 => {
            tolerate_already_exists(tx.execute_batch(V1_BASE_TABLES)).map_err(wrap)?;
        }
        2 => {
            if table_exists(tx, "scraped_tweets").map_err(wrap)? {
                tracing::debug!("scraped_tweets 表已存在，跳过建表");
            } else {
                tolerate_already_exists(tx.execute_batch(V2_SCRAPED_TWEETS_TABLE)).map_err(wrap)?;
            }
            tolerate_already_exists(tx.execute_batch(V2_SCRAPED_TWEETS_INDEXES)).map_err(wrap)?;
        }
        3 => {
            let (table, column, ty) = V3_DISPLAY_NAME_COLUMN;
            ensure_column(tx, table, column, ty).map_err(wrap)?;
        }
        _ => {}
    }
    Ok(())
}

/// 补列（已存在则跳过）
///
/// 返回是否实际新增
fn ensure_column(
    conn: &Connection,
    table: &str,
    column: &str,
    column_type: &str,
) -> rusqlite::Result<bool> {
    if column_exists(conn, table, column)? {
        tracing::debug!("{}.{} 已存在，跳过", table, column);
        return Ok(false);
    }

    let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_type);
    match conn.execute_batch(&sql) {
        Ok(()) => {
            tracing::info!("已新增列 {}.{}", table, column);
            Ok(true)
        }
        Err(e) if is_already_exists_error(&e) => Ok(false),
        Err(e) => Err(e),
    }
}

/// "已存在" 类错误视为成功，其余错误原样返回
fn tolerate_already_exists(result: rusqlite::Result<()>) -> rusqlite::Result<()> {
    match result {
        Err(e) if is_already_exists_error(&e) => {
            tracing::debug!("对象已存在，跳过: {}", e);
            Ok(())
        }
        other => other,
    }
}

fn is_already_exists_error(err: &rusqlite::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("duplicate column name") || msg.contains("already exists")
}

/// 覆盖写入版本记录（单行）
fn record_version(tx: &Transaction<'_>, version: i64, notes: &str) -> rusqlite::Result<()> {
    tx.execute("DELETE FROM database_version", [])?;
    tx.execute(
        "INSERT INTO database_version (id, version, updated_at, migration_notes) VALUES (1, ?1, ?2, ?3)",
        params![version, Utc::now().naive_utc(), notes],
    )?;
    tracing::debug!("数据库版本记录为 v{}: {}", version, notes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{list_tables, open_sqlite_connection, DEFAULT_BUSY_TIMEOUT_MS, IN_MEMORY_PATH};

    fn memory_conn() -> Connection {
        open_sqlite_connection(IN_MEMORY_PATH, DEFAULT_BUSY_TIMEOUT_MS).unwrap()
    }

    #[test]
    fn test_fresh_store_created_at_latest() {
        let mut conn = memory_conn();
        let outcome = ensure_schema(&mut conn, CURRENT_SCHEMA_VERSION).unwrap();

        assert!(outcome.fresh);
        assert_eq!(outcome.from_version, 0);
        assert_eq!(read_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(
            list_tables(&conn).unwrap(),
            vec!["campaigns", "database_version", "scraped_tweets", "tweets"]
        );
        assert!(column_exists(&conn, "campaigns", "display_name").unwrap());
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn, CURRENT_SCHEMA_VERSION).unwrap();
        let tables_once = list_tables(&conn).unwrap();

        let second = ensure_schema(&mut conn, CURRENT_SCHEMA_VERSION).unwrap();
        assert!(second.is_noop());
        assert_eq!(list_tables(&conn).unwrap(), tables_once);
        assert_eq!(read_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM database_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_incremental_from_v1() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn, 1).unwrap();
        assert!(!table_exists(&conn, "scraped_tweets").unwrap());
        assert!(!column_exists(&conn, "campaigns", "display_name").unwrap());

        let outcome = ensure_schema(&mut conn, 3).unwrap();
        assert_eq!(outcome.applied_steps, vec![2, 3]);
        assert!(table_exists(&conn, "scraped_tweets").unwrap());
        assert!(column_exists(&conn, "campaigns", "display_name").unwrap());

        let notes: String = conn
            .query_row("SELECT migration_notes FROM database_version", [], |r| r.get(0))
            .unwrap();
        assert!(notes.contains("display_name"));
    }

    #[test]
    fn test_step_rerun_with_existing_objects() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn, 2).unwrap();

        // 模拟: 列已手工加上但版本未记录
        conn.execute_batch("ALTER TABLE campaigns ADD COLUMN display_name TEXT")
            .unwrap();
        let outcome = ensure_schema(&mut conn, 3).unwrap();
        assert_eq!(outcome.applied_steps, vec![3]);
        assert_eq!(read_schema_version(&conn).unwrap(), 3);
    }

    #[test]
    fn test_downgrade_and_unknown_target_rejected() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn, 3).unwrap();

        assert!(matches!(
            ensure_schema(&mut conn, 2),
            Err(MigrationError::Downgrade { current: 3, target: 2 })
        ));
        assert!(matches!(
            ensure_schema(&mut conn, 4),
            Err(MigrationError::UnknownTarget { target: 4, .. })
        ));
        assert_eq!(read_schema_version(&conn).unwrap(), 3);
    }

    #[test]
    fn test_failed_step_rolls_back() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn, 1).unwrap();

        // 用同名视图占位: v3 补列报错，v2 已建的表随整体回滚消失
        conn.execute_batch("DROP TABLE campaigns; CREATE VIEW campaigns AS SELECT 1 AS x;")
            .unwrap();

        let result = ensure_schema(&mut conn, 3);
        assert!(result.is_err());
        assert_eq!(read_schema_version(&conn).unwrap(), 1);
        assert!(!table_exists(&conn, "scraped_tweets").unwrap());
    }
}
