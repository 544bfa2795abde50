// ==========================================
// 按需印刷商城 - 批量商品导入与规格矩阵引擎
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 商品 feed 解析 / 规格矩阵展开 / 部分失败语义下的目录落库
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - Catalog Store
pub mod repository;

// 引擎层 - 矩阵展开 / 编号分配
pub mod engine;

// 导入层 - feed 解析与执行
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ProductStatus, VariantStatus};

// 领域实体
pub use domain::{
    AttributeDefinition, CallerIdentity, ImportPhase, ImportReport, ImportStatus, ImportWarning,
    ProductRecord, StoredProduct, VariantRecord, WarningKind,
};

// 引擎
pub use engine::{expand, IdentifierAllocator, MatrixExpander};

// 导入
pub use importer::{parse, CatalogImporter, CatalogImporterImpl};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "按需印刷商城 - 批量商品导入";
