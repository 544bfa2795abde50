// ==========================================
// 按需印刷商城 - 导入领域模型
// ==========================================
// 职责: 调用方身份 / 导入状态计数 / 导入告警 / 导入报告
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CallerIdentity - 调用方身份
// ==========================================
// 来源: 外部认证服务（不在本模块范围）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub user_id: String,
}

impl CallerIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// 空白 user_id 视为未认证
    pub fn is_authenticated(&self) -> bool {
        !self.user_id.trim().is_empty()
    }
}

// ==========================================
// ImportStatus - 导入状态计数
// ==========================================
// 红线: success + failed <= total; total 在解析完成后固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportStatus {
    total: usize,
    success: usize,
    failed: usize,
}

impl ImportStatus {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            success: 0,
            failed: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn success(&self) -> usize {
        self.success
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// 尚未尝试的记录数
    pub fn pending(&self) -> usize {
        self.total - self.success - self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }

    pub(crate) fn record_success(&mut self) {
        debug_assert!(self.pending() > 0, "success + failed 不得超过 total");
        self.success += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        debug_assert!(self.pending() > 0, "success + failed 不得超过 total");
        self.failed += 1;
    }
}

// ==========================================
// ImportPhase - 导入状态机
// ==========================================
// idle → validating_headers → parsing → persisting → complete
// 无重试状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    #[default]
    Idle,
    ValidatingHeaders,
    Parsing,
    Persisting,
    Complete,
}

impl ImportPhase {
    /// 下一阶段（Complete 为终态）
    pub fn next(self) -> Self {
        match self {
            ImportPhase::Idle => ImportPhase::ValidatingHeaders,
            ImportPhase::ValidatingHeaders => ImportPhase::Parsing,
            ImportPhase::Parsing => ImportPhase::Persisting,
            ImportPhase::Persisting | ImportPhase::Complete => ImportPhase::Complete,
        }
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportPhase::Idle => write!(f, "idle"),
            ImportPhase::ValidatingHeaders => write!(f, "validating_headers"),
            ImportPhase::Parsing => write!(f, "parsing"),
            ImportPhase::Persisting => write!(f, "persisting"),
            ImportPhase::Complete => write!(f, "complete"),
        }
    }
}

// ==========================================
// WarningKind - 告警类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    MalformedNumber, // 数值无法解析,已降级为默认值
    UnknownEnumValue, // 状态取值未知,已使用默认值
    NegativeStock,   // 库存为负,已置 0
    IgnoredRow,      // 既非商品行也非规格续行
    OrphanVariant,   // 规格续行前没有商品行
    AdvisoryPrice,   // 划线价低于售价（仅提示）
    RecordRejected,  // DQ 校验阻断,未落库
    PersistFailed,   // 落库失败
}

// ==========================================
// ImportWarning - 导入告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportWarning {
    pub line: usize,           // 源文件行号（1 起,表头为第 1 行）
    pub field: Option<String>, // 相关字段
    pub kind: WarningKind,
    pub message: String,
}

impl ImportWarning {
    pub fn new(line: usize, field: Option<&str>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            line,
            field: field.map(str::to_string),
            kind,
            message: message.into(),
        }
    }
}

// ==========================================
// DqLevel / DqViolation - 数据质量校验
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,   // 错误（阻断落库）
    Warning, // 警告（允许落库）
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub line: usize,
    pub product_name: String,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub status: ImportStatus,
    pub phase: ImportPhase,
    pub assigned_ids: Vec<i64>, // 按落库顺序
    pub warnings: Vec<ImportWarning>,
    pub elapsed_ms: u64,
}

impl ImportReport {
    /// 面向用户的摘要（按当前 locale 翻译）
    pub fn summary_message(&self) -> String {
        crate::i18n::t_with_args(
            "import.summary",
            &[
                ("total", &self.status.total().to_string()),
                ("success", &self.status.success().to_string()),
                ("failed", &self.status.failed().to_string()),
                ("warnings", &self.warnings.len().to_string()),
            ],
        )
    }
}
