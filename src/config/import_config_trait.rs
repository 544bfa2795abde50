// ==========================================
// 按需印刷商城 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// IdStrategy - 编号分配策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdStrategy {
    /// 导入开始时读取最大编号一次,之后本地递增
    #[default]
    ClientSequential,
    /// 每条记录由存储端在写事务内分配编号
    StoreSequence,
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::ClientSequential => write!(f, "CLIENT_SEQUENTIAL"),
            IdStrategy::StoreSequence => write!(f, "STORE_SEQUENCE"),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLIENT_SEQUENTIAL" => Ok(IdStrategy::ClientSequential),
            "STORE_SEQUENCE" => Ok(IdStrategy::StoreSequence),
            other => Err(format!("未知编号策略: {}", other)),
        }
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 字段分隔符（单个 ASCII 字符）
    ///
    /// # 默认值
    /// - ','
    async fn get_field_delimiter(&self) -> ImportResult<u8>;

    /// 编号分配策略
    ///
    /// # 默认值
    /// - CLIENT_SEQUENTIAL
    async fn get_id_strategy(&self) -> ImportResult<IdStrategy>;

    /// price 非正数时是否阻断落库
    ///
    /// # 默认值
    /// - true
    async fn get_reject_invalid_price(&self) -> ImportResult<bool>;

    /// 被忽略的行是否记录为告警
    ///
    /// # 默认值
    /// - true
    async fn get_report_ignored_rows(&self) -> ImportResult<bool>;
}

// ==========================================
// ImportConfig - 单次导入使用的配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub field_delimiter: u8,
    pub id_strategy: IdStrategy,
    pub reject_invalid_price: bool,
    pub report_ignored_rows: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            field_delimiter: b',',
            id_strategy: IdStrategy::default(),
            reject_invalid_price: true,
            report_ignored_rows: true,
        }
    }
}

impl ImportConfig {
    /// 读取一次配置快照（导入过程中不再变化）
    pub async fn load<C: ImportConfigReader + ?Sized>(reader: &C) -> ImportResult<Self> {
        Ok(Self {
            field_delimiter: reader.get_field_delimiter().await?,
            id_strategy: reader.get_id_strategy().await?,
            reject_invalid_price: reader.get_reject_invalid_price().await?,
            report_ignored_rows: reader.get_report_ignored_rows().await?,
        })
    }
}

// 固定配置（不落库场景 / 测试）
#[async_trait]
impl ImportConfigReader for ImportConfig {
    async fn get_field_delimiter(&self) -> ImportResult<u8> {
        Ok(self.field_delimiter)
    }

    async fn get_id_strategy(&self) -> ImportResult<IdStrategy> {
        Ok(self.id_strategy)
    }

    async fn get_reject_invalid_price(&self) -> ImportResult<bool> {
        Ok(self.reject_invalid_price)
    }

    async fn get_report_ignored_rows(&self) -> ImportResult<bool> {
        Ok(self.report_ignored_rows)
    }
}
