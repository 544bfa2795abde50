// ==========================================
// 按需印刷商城 - 商品导入执行器实现
// ==========================================
// 职责: 整合导入流程,从 feed 文本到 Catalog Store
// 流程: 身份校验 → 表头校验 → 解析 → 分配编号 → 逐条校验/落库 → 汇总
// 红线: 单条记录失败只计入 failed,不中断批次; 不回滚已成功记录
// 红线: 严格串行落库,编号在一次导入内单调递增
// ==========================================

use crate::config::{IdStrategy, ImportConfig, ImportConfigReader};
use crate::domain::{
    CallerIdentity, DqLevel, ImportPhase, ImportReport, ImportStatus, ImportWarning, ProductRecord,
    WarningKind,
};
use crate::engine::IdentifierAllocator;
use crate::importer::catalog_importer_trait::{CatalogImporter, DqValidator, FeedParser};
use crate::importer::dq_validator::DqValidator as DqValidatorImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::feed_parser::{CsvFeedParser, ParseOptions};
use crate::importer::header_map::HeaderMap;
use crate::repository::{CatalogStore, RepositoryResult};
use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// CatalogImporterImpl - 商品导入执行器
// ==========================================
pub struct CatalogImporterImpl<S, C>
where
    S: CatalogStore,
    C: ImportConfigReader,
{
    // 外部目录存储
    store: S,

    // 配置读取器
    config: C,

    // 解析组件
    feed_parser: Box<dyn FeedParser>,
}

impl<S, C> CatalogImporterImpl<S, C>
where
    S: CatalogStore,
    C: ImportConfigReader,
{
    /// 创建新的导入执行器（默认 CSV 解析器）
    pub fn new(store: S, config: C) -> Self {
        Self::with_parser(store, config, Box::new(CsvFeedParser::new()))
    }

    pub fn with_parser(store: S, config: C, feed_parser: Box<dyn FeedParser>) -> Self {
        Self {
            store,
            config,
            feed_parser,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S, C> CatalogImporter for CatalogImporterImpl<S, C>
where
    S: CatalogStore + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, feed_text, caller), fields(batch_id))]
    async fn run(
        &self,
        feed_text: &str,
        caller: Option<&CallerIdentity>,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let mut phase = ImportPhase::Idle;

        // === 前置: 调用方身份 ===
        let caller = match caller {
            Some(c) if c.is_authenticated() => c,
            _ => {
                warn!("未认证的调用方,拒绝导入");
                return Err(ImportError::AuthenticationRequired);
            }
        };

        let config = ImportConfig::load(&self.config).await?;

        // === 阶段 1: 表头校验 ===
        phase = advance(phase, &batch_id);
        let header = HeaderMap::from_feed(feed_text, config.field_delimiter)?;
        let missing = header.missing_required();
        if !missing.is_empty() {
            error!(missing = ?missing, "缺少必需表头,拒绝导入");
            return Err(ImportError::MissingHeaders { missing });
        }

        // === 阶段 2: 解析 ===
        phase = advance(phase, &batch_id);
        let options = ParseOptions {
            delimiter: config.field_delimiter,
            report_ignored_rows: config.report_ignored_rows,
        };
        let mut parsed = self.feed_parser.parse_feed(feed_text, &options);
        let mut status = ImportStatus::new(parsed.products.len());
        let mut warnings = std::mem::take(&mut parsed.warnings);
        info!(
            total = status.total(),
            variants = parsed.variant_count(),
            parse_warnings = warnings.len(),
            "feed 解析完成"
        );

        // === 阶段 3: 逐条落库 ===
        phase = advance(phase, &batch_id);
        let mut working_id = match config.id_strategy {
            IdStrategy::ClientSequential if status.total() > 0 => Some(
                IdentifierAllocator::new(&self.store)
                    .next_id(caller)
                    .await?,
            ),
            _ => None,
        };
        debug!(id_strategy = %config.id_strategy, start_id = ?working_id, "编号策略");

        let validator = DqValidatorImpl::new(config.reject_invalid_price);
        let mut assigned_ids = Vec::with_capacity(status.total());

        for product in &parsed.products {
            let violations = validator.validate_product(product);
            let blocked = violations.iter().any(|v| v.level == DqLevel::Error);
            for violation in &violations {
                let kind = match violation.level {
                    DqLevel::Error => WarningKind::RecordRejected,
                    DqLevel::Warning => WarningKind::AdvisoryPrice,
                };
                warnings.push(ImportWarning::new(
                    violation.line,
                    Some(violation.field.as_str()),
                    kind,
                    violation.message.clone(),
                ));
            }

            if blocked {
                status.record_failure();
                warn!(line = product.line_number, name = %product.name, "商品未通过 DQ 校验,跳过落库");
                continue;
            }

            match self.persist(product, caller, working_id, &batch_id).await {
                Ok(product_id) => {
                    status.record_success();
                    assigned_ids.push(product_id);
                    if let Some(id) = working_id.as_mut() {
                        *id += 1;
                    }
                    debug!(product_id, name = %product.name, "商品落库成功");
                }
                Err(e) => {
                    status.record_failure();
                    warn!(line = product.line_number, name = %product.name, error = %e, "商品落库失败");
                    warnings.push(ImportWarning::new(
                        product.line_number,
                        None,
                        WarningKind::PersistFailed,
                        format!("{} 落库失败: {}", product.name, e),
                    ));
                }
            }
        }

        // === 完成 ===
        phase = advance(phase, &batch_id);
        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        info!(
            batch_id = %batch_id,
            total = status.total(),
            success = status.success(),
            failed = status.failed(),
            warnings = warnings.len(),
            elapsed_ms,
            "商品导入完成"
        );

        Ok(ImportReport {
            batch_id,
            status,
            phase,
            assigned_ids,
            warnings,
            elapsed_ms,
        })
    }

    async fn run_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        caller: Option<&CallerIdentity>,
    ) -> ImportResult<ImportReport> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let feed_text = tokio::fs::read_to_string(path).await?;
        info!(file_path = %path.display(), bytes = feed_text.len(), "读取 feed 文件");

        self.run(&feed_text, caller).await
    }
}

// 辅助方法
impl<S, C> CatalogImporterImpl<S, C>
where
    S: CatalogStore,
    C: ImportConfigReader,
{
    /// 落库单个商品,返回实际使用的编号
    async fn persist(
        &self,
        product: &ProductRecord,
        caller: &CallerIdentity,
        working_id: Option<i64>,
        batch_id: &str,
    ) -> RepositoryResult<i64> {
        match working_id {
            Some(product_id) => {
                self.store
                    .insert_product(product_id, caller, product, Some(batch_id))
                    .await?;
                Ok(product_id)
            }
            None => {
                self.store
                    .insert_product_with_next_id(caller, product, Some(batch_id))
                    .await
            }
        }
    }
}

fn advance(phase: ImportPhase, batch_id: &str) -> ImportPhase {
    let next = phase.next();
    debug!(batch_id = %batch_id, from = %phase, to = %next, "导入阶段切换");
    next
}
