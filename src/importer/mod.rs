// ==========================================
// 按需印刷商城 - 导入层
// ==========================================
// 职责: 商品 feed 导入,生成目录记录
// 支持: CSV（可配置分隔符,支持引号字段）
// ==========================================

// 模块声明
pub mod catalog_importer_impl;
pub mod catalog_importer_trait;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod feed_parser;
pub mod field_mapper;
pub mod header_map;

// 重导出核心类型
pub use catalog_importer_impl::CatalogImporterImpl;
pub use data_cleaner::{DataCleaner as DataCleanerImpl, FieldParseError};
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use feed_parser::{classify_row, parse, CsvFeedParser, ParseOptions, ParsedFeed, RowKind};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use header_map::{HeaderMap, DOMAIN_ATTRIBUTE_COLUMNS, REQUIRED_HEADERS};

// 重导出 Trait 接口
pub use catalog_importer_trait::{CatalogImporter, DataCleaner, DqValidator, FeedParser, FieldMapper};
