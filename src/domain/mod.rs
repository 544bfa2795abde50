// ==========================================
// 按需印刷商城 - 领域模型层
// ==========================================
// 职责: 定义商品、规格、导入状态等领域实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod import;
pub mod product;
pub mod types;

// 重导出核心类型
pub use import::{
    CallerIdentity, DqLevel, DqViolation, ImportPhase, ImportReport, ImportStatus,
    ImportWarning, WarningKind,
};
pub use product::{AttributeDefinition, ProductRecord, StoredProduct, VariantRecord};
pub use types::{ProductStatus, VariantStatus};
