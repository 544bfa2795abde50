// ==========================================
// 按需印刷商城 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (scope_id + key → value)
// ==========================================

use crate::config::import_config_trait::{IdStrategy, ImportConfigReader};
use crate::db::{configure_sqlite_connection, init_catalog_schema, open_sqlite_connection};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const FIELD_DELIMITER: &str = "import/field_delimiter";
    pub const ID_STRATEGY: &str = "import/id_strategy";
    pub const REJECT_INVALID_PRICE: &str = "import/reject_invalid_price";
    pub const REPORT_IGNORED_ROWS: &str = "import/report_ignored_rows";
    pub const MAX_VARIANT_COMBINATIONS: &str = "variant/max_combinations";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| Self::db_error("open", e))?;
        init_catalog_schema(&conn).map_err(|e| Self::db_error("schema", e))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;
            configure_sqlite_connection(&guard).map_err(|e| Self::db_error("pragma", e))?;
            init_catalog_schema(&guard).map_err(|e| Self::db_error("schema", e))?;
        }

        Ok(Self { conn })
    }

    fn db_error(key: &str, err: rusqlite::Error) -> ImportError {
        ImportError::ConfigReadError {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| Self::db_error(key, e))
    }

    /// 写入 global scope 的配置值（覆盖已有值）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )
        .map_err(|e| Self::db_error(key, e))?;

        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON 格式）
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")
            .map_err(|e| Self::db_error("snapshot", e))?;
        let rows = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| Self::db_error("snapshot", e))?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row.map_err(|e| Self::db_error("snapshot", e))?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&config_map)
            .map_err(|e| ImportError::InternalError(format!("配置快照序列化失败: {}", e)))
    }

    /// 读取并解析配置,缺失时返回默认值
    fn get_parsed_or<T, F>(&self, key: &str, default: T, parse: F) -> ImportResult<T>
    where
        F: FnOnce(&str) -> Result<T, String>,
    {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => parse(raw.trim()).map_err(|message| ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message,
            }),
        }
    }

    /// 属性矩阵组合数上限（仅 API 展开规格时使用）
    ///
    /// # 默认值
    /// - 500
    pub fn get_max_variant_combinations(&self) -> ImportResult<usize> {
        self.get_parsed_or(
            config_keys::MAX_VARIANT_COMBINATIONS,
            crate::engine::DEFAULT_MAX_COMBINATIONS,
            |raw| {
                raw.parse::<usize>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| "期望正整数".to_string())
            },
        )
    }
}

fn parse_bool_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("期望布尔值,实际 {}", other)),
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_field_delimiter(&self) -> ImportResult<u8> {
        self.get_parsed_or(config_keys::FIELD_DELIMITER, b',', |raw| {
            let bytes = raw.as_bytes();
            if raw == "\\t" {
                Ok(b'\t')
            } else if bytes.len() == 1 && bytes[0].is_ascii() {
                Ok(bytes[0])
            } else {
                Err("分隔符必须是单个 ASCII 字符".to_string())
            }
        })
    }

    async fn get_id_strategy(&self) -> ImportResult<IdStrategy> {
        self.get_parsed_or(config_keys::ID_STRATEGY, IdStrategy::default(), |raw| raw.parse())
    }

    async fn get_reject_invalid_price(&self) -> ImportResult<bool> {
        self.get_parsed_or(config_keys::REJECT_INVALID_PRICE, true, parse_bool_flag)
    }

    async fn get_report_ignored_rows(&self) -> ImportResult<bool> {
        self.get_parsed_or(config_keys::REPORT_IGNORED_ROWS, true, parse_bool_flag)
    }
}
