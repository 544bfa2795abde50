// ==========================================
// 商品导入API
// ==========================================
// 职责: 封装商品批量导入、规格矩阵展开、目录查询
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::domain::{
    AttributeDefinition, CallerIdentity, ImportReport, ImportWarning, StoredProduct, VariantRecord,
};
use crate::engine::MatrixExpander;
use crate::importer::{CatalogImporter, CatalogImporterImpl};
use crate::repository::{CatalogStore, CatalogStoreImpl};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::info;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入批次ID
    pub batch_id: String,
    /// 解析出的商品数
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// 实际落库使用的商品编号（按落库顺序）
    pub assigned_ids: Vec<i64>,
    /// 解析/校验/落库告警明细
    pub warnings: Vec<ImportWarning>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
    /// 本地化摘要
    pub summary: String,
}

impl From<ImportReport> for ImportApiResponse {
    fn from(report: ImportReport) -> Self {
        let summary = report.summary_message();
        Self {
            batch_id: report.batch_id,
            total: report.status.total(),
            success: report.status.success(),
            failed: report.status.failed(),
            assigned_ids: report.assigned_ids,
            warnings: report.warnings,
            elapsed_ms: report.elapsed_ms,
            summary,
        }
    }
}

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// 导入一段 feed 文本
    ///
    /// # 参数
    /// - feed_text: feed 内容（首行为表头）
    /// - user_id: 调用方用户ID（None = 未登录）
    pub async fn import_catalog(
        &self,
        feed_text: &str,
        user_id: Option<&str>,
    ) -> ApiResult<ImportApiResponse> {
        let importer = self.create_importer()?;
        let caller = user_id.map(CallerIdentity::new);

        let report = importer.run(feed_text, caller.as_ref()).await?;
        Ok(report.into())
    }

    /// 导入 feed 文件
    pub async fn import_catalog_file(
        &self,
        file_path: &str,
        user_id: Option<&str>,
    ) -> ApiResult<ImportApiResponse> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let importer = self.create_importer()?;
        let caller = user_id.map(CallerIdentity::new);

        let report = importer.run_file(file_path, caller.as_ref()).await?;
        info!(file_path, batch_id = %report.batch_id, "文件导入完成");
        Ok(report.into())
    }

    /// 按属性定义展开规格矩阵（不落库）
    ///
    /// # 说明
    /// 组合数上限读取 variant/max_combinations
    pub async fn expand_variants(
        &self,
        attributes: &[AttributeDefinition],
    ) -> ApiResult<Vec<VariantRecord>> {
        let config = ConfigManager::from_connection(self.open_connection()?)?;
        let limit = config.get_max_variant_combinations()?;

        Ok(MatrixExpander::new(limit).expand(attributes)?)
    }

    /// 查询单个商品
    pub async fn get_product(&self, product_id: i64) -> ApiResult<StoredProduct> {
        let store = CatalogStoreImpl::from_connection(self.open_connection()?)?;
        store
            .find_product(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("商品(id={})不存在", product_id)))
    }

    /// 列出某用户名下的商品
    pub async fn list_products_by_owner(&self, user_id: &str) -> ApiResult<Vec<StoredProduct>> {
        let store = CatalogStoreImpl::from_connection(self.open_connection()?)?;
        Ok(store
            .list_products_by_owner(&CallerIdentity::new(user_id))
            .await?)
    }

    fn open_connection(&self) -> ApiResult<Arc<Mutex<Connection>>> {
        let conn = open_sqlite_connection(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        Ok(Arc::new(Mutex::new(conn)))
    }

    // Store 与配置共用同一连接
    fn create_importer(&self) -> ApiResult<CatalogImporterImpl<CatalogStoreImpl, ConfigManager>> {
        let conn = self.open_connection()?;
        let store = CatalogStoreImpl::from_connection(conn.clone())?;
        let config = ConfigManager::from_connection(conn)?;

        Ok(CatalogImporterImpl::new(store, config))
    }
}
