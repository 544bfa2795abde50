// ==========================================
// 按需印刷商城 - 数据质量校验器实现
// ==========================================
// 职责: 落库前校验单个商品
// ERROR:   name 为空 / price 非正数
// WARNING: original_price < price（仅提示,不阻断）
// ==========================================

use crate::domain::{DqLevel, DqViolation, ProductRecord};
use crate::importer::catalog_importer_trait::DqValidator as DqValidatorTrait;

pub struct DqValidator {
    // price 非正数时是否阻断落库
    reject_invalid_price: bool,
}

impl DqValidator {
    pub fn new(reject_invalid_price: bool) -> Self {
        Self {
            reject_invalid_price,
        }
    }

    fn violation(product: &ProductRecord, level: DqLevel, field: &str, message: String) -> DqViolation {
        DqViolation {
            line: product.line_number,
            product_name: product.name.clone(),
            level,
            field: field.to_string(),
            message,
        }
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate_product(&self, product: &ProductRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        if product.name.trim().is_empty() {
            violations.push(Self::violation(
                product,
                DqLevel::Error,
                "name",
                "商品名称不能为空".to_string(),
            ));
        }

        if !(product.price.is_finite() && product.price > 0.0) {
            let level = if self.reject_invalid_price {
                DqLevel::Error
            } else {
                DqLevel::Warning
            };
            violations.push(Self::violation(
                product,
                level,
                "price",
                format!("价格必须为正数,实际 {}", product.price),
            ));
        }

        if let Some(original) = product.original_price {
            if original < product.price {
                violations.push(Self::violation(
                    product,
                    DqLevel::Warning,
                    "original_price",
                    format!("划线价 {} 低于售价 {}", original, product.price),
                ));
            }
        }

        violations
    }
}
