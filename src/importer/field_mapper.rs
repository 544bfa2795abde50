// ==========================================
// 按需印刷商城 - 字段映射器实现
// ==========================================
// 职责: 表头列 → ProductRecord / VariantRecord 字段 + 类型转换
// 规则: 列存在且非空才填充,否则保留类型默认值
// 规则: 数值解析失败 → 降级为默认值 + 记录告警（不中断整批）
// ==========================================

use crate::domain::{
    ImportWarning, ProductRecord, ProductStatus, VariantRecord, VariantStatus, WarningKind,
};
use crate::importer::catalog_importer_trait::{DataCleaner, FieldMapper as FieldMapperTrait};
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::header_map::{HeaderMap, DOMAIN_ATTRIBUTE_COLUMNS};
use csv::StringRecord;
use std::collections::BTreeMap;

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_product(
        &self,
        header: &HeaderMap,
        record: &StringRecord,
        line: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> ProductRecord {
        let mut product = ProductRecord::new(
            self.get_string(header, record, "name").unwrap_or_default(),
            self.parse_decimal_or(header, record, "price", 0.0, line, warnings),
            self.get_string(header, record, "category").unwrap_or_default(),
        );

        product.original_price = self.parse_optional_decimal(header, record, "original_price", line, warnings);
        product.subcategory = self.get_string(header, record, "subcategory");
        product.description = self.get_string(header, record, "description");
        product.image = self.get_string(header, record, "image");
        product.is_customizable = header
            .get(record, "is_customizable")
            .map(|v| DataCleanerImpl.parse_bool(v))
            .unwrap_or(false);

        if let Some(raw) = header.get(record, "status") {
            product.status = match raw.parse::<ProductStatus>() {
                Ok(status) => status,
                Err(message) => {
                    warnings.push(ImportWarning::new(
                        line,
                        Some("status"),
                        WarningKind::UnknownEnumValue,
                        format!("{},使用默认值 {}", message, ProductStatus::default()),
                    ));
                    ProductStatus::default()
                }
            };
        }

        product.line_number = line;
        product
    }

    fn map_variant(
        &self,
        header: &HeaderMap,
        record: &StringRecord,
        line: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> VariantRecord {
        let mut variant = VariantRecord::new(
            self.get_string(header, record, "size").unwrap_or_default(),
            self.get_string(header, record, "color").unwrap_or_default(),
        );
        variant.hex_color = self.get_string(header, record, "hex_color").unwrap_or_default();
        variant.price_adjustment =
            self.parse_decimal_or(header, record, "price_adjustment", 0.0, line, warnings);

        variant.stock = match header.get(record, "stock") {
            None => 0,
            Some(raw) => match DataCleanerImpl.parse_integer(raw) {
                Ok(stock) if stock < 0 => {
                    warnings.push(ImportWarning::new(
                        line,
                        Some("stock"),
                        WarningKind::NegativeStock,
                        format!("库存不能为负: {},已置 0", stock),
                    ));
                    0
                }
                Ok(stock) => stock,
                Err(e) => {
                    warnings.push(ImportWarning::new(
                        line,
                        Some("stock"),
                        WarningKind::MalformedNumber,
                        format!("{},已置 0", e),
                    ));
                    0
                }
            },
        };

        if let Some(raw) = header.get(record, "variant_status") {
            variant.status = match raw.parse::<VariantStatus>() {
                Ok(status) => status,
                Err(message) => {
                    warnings.push(ImportWarning::new(
                        line,
                        Some("variant_status"),
                        WarningKind::UnknownEnumValue,
                        format!("{},使用默认值 {}", message, VariantStatus::default()),
                    ));
                    VariantStatus::default()
                }
            };
        }

        variant.attributes = self.collect_attributes(header, record);
        variant
    }
}

impl FieldMapper {
    /// 提取字符串字段（列不存在或为空 → None）
    fn get_string(&self, header: &HeaderMap, record: &StringRecord, column: &str) -> Option<String> {
        DataCleanerImpl.normalize_null(header.get(record, column))
    }

    /// 解析必填数值,失败时返回 fallback 并记录告警
    fn parse_decimal_or(
        &self,
        header: &HeaderMap,
        record: &StringRecord,
        column: &str,
        fallback: f64,
        line: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> f64 {
        match header.get(record, column) {
            None => fallback,
            Some(raw) => DataCleanerImpl.parse_decimal(raw).unwrap_or_else(|e| {
                warnings.push(ImportWarning::new(
                    line,
                    Some(column),
                    WarningKind::MalformedNumber,
                    format!("{},使用 {}", e, fallback),
                ));
                fallback
            }),
        }
    }

    /// 解析可选数值,失败时视为缺失并记录告警
    fn parse_optional_decimal(
        &self,
        header: &HeaderMap,
        record: &StringRecord,
        column: &str,
        line: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> Option<f64> {
        let raw = header.get(record, column)?;
        match DataCleanerImpl.parse_decimal(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warnings.push(ImportWarning::new(
                    line,
                    Some(column),
                    WarningKind::MalformedNumber,
                    format!("{},已忽略", e),
                ));
                None
            }
        }
    }

    /// 业务属性列 → attributes
    fn collect_attributes(&self, header: &HeaderMap, record: &StringRecord) -> BTreeMap<String, String> {
        DOMAIN_ATTRIBUTE_COLUMNS
            .iter()
            .filter_map(|column| {
                header
                    .get(record, column)
                    .map(|value| (column.to_string(), value.to_string()))
            })
            .collect()
    }
}
