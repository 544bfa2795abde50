// ==========================================
// 按需印刷商城 - 商品编号分配器
// ==========================================
// 职责: 读取 Catalog Store 当前最大编号 → +1
// 规则: 存储为空或最大编号无法解析为整数 → 1
// 注意: 读后使用,无锁; 两个并发导入可能算出同一个编号,
//       冲突在写入时以 UniqueConstraintViolation 暴露（单条失败）。
//       需要严格串行编号时使用 IdStrategy::StoreSequence。
// ==========================================

use crate::domain::CallerIdentity;
use crate::repository::{CatalogStore, RepositoryResult};
use tracing::debug;

/// 将存储中的原始最大编号转换为下一个编号
pub fn next_id_after(raw_max: Option<&str>) -> i64 {
    raw_max
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(|max| max.max(0).saturating_add(1))
        .unwrap_or(1)
}

pub struct IdentifierAllocator<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> IdentifierAllocator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 下一个可用编号（正整数）
    pub async fn next_id(&self, caller: &CallerIdentity) -> RepositoryResult<i64> {
        let raw_max = self.store.select_max_id(caller).await?;
        let next = next_id_after(raw_max.as_deref());
        debug!(raw_max = ?raw_max, next_id = next, "商品编号已分配");
        Ok(next)
    }
}
