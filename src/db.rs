// ==========================================
// 推文审核系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供 schema 版本读取（database_version 单行表）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema 版本（与 `migration::ddl` 中的步骤对齐）
pub const CURRENT_SCHEMA_VERSION: i64 = 3;

/// 内存库路径标记
pub const IN_MEMORY_PATH: &str = ":memory:";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - tweets.campaign_batch 不是硬外键，这里仍开启 foreign_keys 以保持行为一致
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
///
/// `db_path` 为 `:memory:` 时打开内存库（测试用）
pub fn open_sqlite_connection(db_path: &str, busy_timeout_ms: u64) -> rusqlite::Result<Connection> {
    let conn = if db_path == IN_MEMORY_PATH {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };
    configure_sqlite_connection(&conn, busy_timeout_ms)?;
    Ok(conn)
}

/// 判断表是否存在
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// 判断列是否存在
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.iter().any(|name| name == column))
}

/// 列出所有用户表（按名称排序，不含 sqlite_ 内部表）
pub fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tables)
}

/// 读取 schema 版本
///
/// database_version 表不存在或为空时返回 0（视为空库）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    if !table_exists(conn, "database_version")? {
        return Ok(0);
    }

    let v: Option<i64> = conn
        .query_row("SELECT version FROM database_version LIMIT 1", [], |row| row.get(0))
        .optional()?;
    Ok(v.unwrap_or(0))
}
