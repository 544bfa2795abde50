// ==========================================
// 按需印刷商城 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的连接参数
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// - 提供目录库建表语句（幂等）
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 目录库建表语句
const CATALOG_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL DEFAULT 'global',
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS catalog_product (
    product_id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    price REAL NOT NULL,
    original_price REAL,
    category TEXT NOT NULL,
    subcategory TEXT,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'draft',
    is_customizable INTEGER NOT NULL DEFAULT 0,
    image TEXT,
    variants_json TEXT NOT NULL DEFAULT '[]',
    import_batch_id TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_catalog_product_owner ON catalog_product(owner_id);
"#;

/// 配置 SQLite 连接的统一参数
///
/// 说明：busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化目录库 schema（可重复调用）
pub fn init_catalog_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CATALOG_SCHEMA_SQL)
}

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "POD_CATALOG_DB_PATH";

/// 默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pod_catalog.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("pod-catalog-import");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("pod_catalog.db");
        }
    }

    path.to_string_lossy().to_string()
}
