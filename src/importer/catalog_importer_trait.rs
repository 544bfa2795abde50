// ==========================================
// 按需印刷商城 - 商品导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::{CallerIdentity, DqViolation, ImportReport, ImportWarning, ProductRecord, VariantRecord};
use crate::importer::data_cleaner::FieldParseError;
use crate::importer::error::ImportResult;
use crate::importer::feed_parser::{ParseOptions, ParsedFeed};
use crate::importer::header_map::HeaderMap;
use async_trait::async_trait;
use csv::StringRecord;
use std::path::Path;

// ==========================================
// CatalogImporter Trait
// ==========================================
// 用途: 商品批量导入主接口
// 实现者: CatalogImporterImpl
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// 导入一段 feed 文本
    ///
    /// # 参数
    /// - feed_text: 结构化文本（首行为表头）
    /// - caller: 调用方身份（None = 未登录）
    ///
    /// # 返回
    /// - Ok(ImportReport): 每条商品记录都已尝试一次
    /// - Err(AuthenticationRequired / MissingHeaders): 批次级致命错误,未处理任何记录
    ///
    /// # 导入流程
    /// 1. 校验调用方身份
    /// 2. 校验必需表头
    /// 3. 解析全部 feed（total 在此固定）
    /// 4. 分配起始编号（一次）
    /// 5. 逐条落库,单条失败不影响其他记录
    async fn run(
        &self,
        feed_text: &str,
        caller: Option<&CallerIdentity>,
    ) -> ImportResult<ImportReport>;

    /// 从文件导入
    async fn run_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        caller: Option<&CallerIdentity>,
    ) -> ImportResult<ImportReport>;
}

// ==========================================
// FeedParser Trait
// ==========================================
// 用途: 行分类 + 商品/规格分组（纯函数,无 I/O,不报错）
// 实现者: CsvFeedParser
pub trait FeedParser: Send + Sync {
    fn parse_feed(&self, text: &str, options: &ParseOptions) -> ParsedFeed;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 单行字段 → ProductRecord / VariantRecord
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 商品起始行 → ProductRecord（规格为空）
    fn map_product(
        &self,
        header: &HeaderMap,
        record: &StringRecord,
        line: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> ProductRecord;

    /// 规格续行 → VariantRecord
    fn map_variant(
        &self,
        header: &HeaderMap,
        record: &StringRecord,
        line: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> VariantRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 字段级类型转换（locale 无关）
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 解析十进制数（"16.99";拒绝 NaN / inf / 逗号小数）
    fn parse_decimal(&self, value: &str) -> Result<f64, FieldParseError>;

    /// 解析整数（允许 "12.0" 这类整值小数）
    fn parse_integer(&self, value: &str) -> Result<i64, FieldParseError>;

    /// 解析布尔值（"true" → true,其他 → false）
    fn parse_bool(&self, value: &str) -> bool;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 落库前数据质量校验
// 实现者: DqValidatorImpl
pub trait DqValidator: Send + Sync {
    /// 校验单个商品
    ///
    /// # 返回
    /// - Vec<DqViolation>: 含 DqLevel::Error 的记录不应落库
    fn validate_product(&self, product: &ProductRecord) -> Vec<DqViolation>;
}
