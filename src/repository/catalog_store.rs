// ==========================================
// 按需印刷商城 - Catalog Store Trait
// ==========================================
// 职责: 定义商品目录存储接口（不包含实现）
// 红线: Repository 不含业务规则,只做 insert / select
// ==========================================

use crate::domain::{CallerIdentity, ProductRecord, StoredProduct};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CatalogStore Trait
// ==========================================
// 用途: 导入执行器 / 编号分配器的外部存储
// 实现者: CatalogStoreImpl（使用 rusqlite）
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// 插入一个商品（规格作为同一条结构化载荷一并写入）
    ///
    /// # 参数
    /// - product_id: 调用方计算的顺序编号
    /// - owner: 调用方身份（写入 owner_id）
    /// - product: 商品记录
    /// - batch_id: 导入批次 ID（人工录入为 None）
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 编号已被占用（并发导入竞争）
    async fn insert_product(
        &self,
        product_id: i64,
        owner: &CallerIdentity,
        product: &ProductRecord,
        batch_id: Option<&str>,
    ) -> RepositoryResult<()>;

    /// 由存储端原子分配编号并插入
    ///
    /// # 返回
    /// - Ok(i64): 存储端分配的编号
    async fn insert_product_with_next_id(
        &self,
        owner: &CallerIdentity,
        product: &ProductRecord,
        batch_id: Option<&str>,
    ) -> RepositoryResult<i64>;

    /// 查询编号数值最大的那条记录的原始编号
    ///
    /// # 返回
    /// - Ok(None): 存储为空
    /// - Ok(Some(raw)): 原始编号文本（可能无法解析为整数,由调用方处理）
    async fn select_max_id(&self, caller: &CallerIdentity) -> RepositoryResult<Option<String>>;

    /// 按编号查询商品
    async fn find_product(&self, product_id: i64) -> RepositoryResult<Option<StoredProduct>>;

    /// 查询某个 owner 的全部商品（按编号升序）
    async fn list_products_by_owner(
        &self,
        owner: &CallerIdentity,
    ) -> RepositoryResult<Vec<StoredProduct>>;

    /// 统计商品数
    async fn count_products(&self) -> RepositoryResult<usize>;
}
