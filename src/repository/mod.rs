// ==========================================
// 按需印刷商城 - 数据仓储层
// ==========================================
// 职责: Catalog Store 接口与 SQLite 实现
// 红线: Repository 不含业务规则
// ==========================================

pub mod catalog_store;
pub mod catalog_store_impl;
pub mod error;

pub use catalog_store::CatalogStore;
pub use catalog_store_impl::CatalogStoreImpl;
pub use error::{RepositoryError, RepositoryResult};
