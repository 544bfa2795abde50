// ==========================================
// 按需印刷商城 - 领域类型定义
// ==========================================
// 职责: 商品状态 / 规格库存状态枚举
// 序列化格式: snake_case (与 Catalog Store 一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 商品状态 (Product Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Draft,     // 草稿
    Published, // 已上架
    Archived,  // 已归档
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Published => write!(f, "published"),
            ProductStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ProductStatus::Draft),
            "published" => Ok(ProductStatus::Published),
            "archived" => Ok(ProductStatus::Archived),
            other => Err(format!("未知商品状态: {}", other)),
        }
    }
}

// ==========================================
// 规格库存状态 (Variant Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    #[default]
    InStock,    // 有货
    LowStock,   // 库存紧张
    OutOfStock, // 缺货
}

impl fmt::Display for VariantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantStatus::InStock => write!(f, "in_stock"),
            VariantStatus::LowStock => write!(f, "low_stock"),
            VariantStatus::OutOfStock => write!(f, "out_of_stock"),
        }
    }
}

impl FromStr for VariantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_stock" => Ok(VariantStatus::InStock),
            "low_stock" => Ok(VariantStatus::LowStock),
            "out_of_stock" => Ok(VariantStatus::OutOfStock),
            other => Err(format!("未知库存状态: {}", other)),
        }
    }
}
