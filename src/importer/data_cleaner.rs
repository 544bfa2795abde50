// ==========================================
// 按需印刷商城 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / locale 无关数值解析
// 说明: 解析失败以 Err 返回,由字段映射器降级并记录告警
// ==========================================

use crate::importer::catalog_importer_trait::DataCleaner as DataCleanerTrait;
use thiserror::Error;

/// 字段解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无法解析为{expected}: {value}")]
pub struct FieldParseError {
    pub value: String,
    pub expected: &'static str,
}

impl FieldParseError {
    fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_decimal(&self, value: &str) -> Result<f64, FieldParseError> {
        let trimmed = value.trim();
        // f64::from_str 接受 "NaN" / "inf",需要额外排除
        let is_numeric_text = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
        if !is_numeric_text {
            return Err(FieldParseError::new(trimmed, "小数"));
        }

        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FieldParseError::new(trimmed, "小数"))
    }

    fn parse_integer(&self, value: &str) -> Result<i64, FieldParseError> {
        let trimmed = value.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return Ok(v);
        }

        match self.parse_decimal(trimmed) {
            Ok(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
            _ => Err(FieldParseError::new(trimmed, "整数")),
        }
    }

    fn parse_bool(&self, value: &str) -> bool {
        value.trim().eq_ignore_ascii_case("true")
    }
}
