// ==========================================
// 按需印刷商城 - 商品领域模型
// ==========================================
// 职责: 商品 / 规格 / 属性定义
// 红线: 规格只隶属于一个商品,不共享、不交叉引用
// ==========================================

use crate::domain::types::{ProductStatus, VariantStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ProductRecord - 商品记录
// ==========================================
// 用途: 解析器 / 人工规格编辑构造,导入执行器落库
// 生命周期: 落库一次,之后不再修改（重复导入生成新记录）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    // ===== 必填 =====
    pub name: String,
    pub price: f64,
    pub category: String,

    // ===== 可选 =====
    pub original_price: Option<f64>, // 划线价（仅提示,不强制 >= price）
    pub subcategory: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub is_customizable: bool,
    pub image: Option<String>,

    // ===== 组合: 规格 =====
    #[serde(default)]
    pub variants: Vec<VariantRecord>,

    // 元信息: 源文件行号（人工录入为 0）
    #[serde(default, skip_serializing)]
    pub line_number: usize,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            original_price: None,
            subcategory: None,
            description: None,
            status: ProductStatus::default(),
            is_customizable: false,
            image: None,
            variants: Vec::new(),
            line_number: 0,
        }
    }

    /// 规格总库存
    pub fn total_stock(&self) -> i64 {
        self.variants.iter().map(|v| v.stock).sum()
    }
}

// ==========================================
// VariantRecord - 规格记录
// ==========================================
// 价格 = 父商品 price + price_adjustment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariantRecord {
    pub size: String,
    pub color: String,
    pub hex_color: String, // 仅用于展示
    pub stock: i64,        // >= 0

    #[serde(default)]
    pub price_adjustment: f64,
    #[serde(default)]
    pub status: VariantStatus,

    // 业务属性（format / poids / bat ...）,不解释,原样透传
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl VariantRecord {
    pub fn new(size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    /// 规格售价
    pub fn unit_price(&self, parent: &ProductRecord) -> f64 {
        parent.price + self.price_adjustment
    }
}

// ==========================================
// AttributeDefinition - 属性定义（矩阵展开输入）
// ==========================================
// 红线: 同一属性内取值唯一（区分大小写）; 空取值列表 = 不参与展开
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub values: Vec<String>,
}

impl AttributeDefinition {
    /// 构造属性定义: 去除空白取值并按首次出现顺序去重
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for value in values {
            let value: String = value.into();
            let value = value.trim().to_string();
            if !value.is_empty() && !unique.contains(&value) {
                unique.push(value);
            }
        }

        Self {
            name: name.into().trim().to_string(),
            values: unique,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.values.is_empty()
    }
}

// ==========================================
// StoredProduct - 已落库商品（读回视图）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProduct {
    pub product_id: i64,
    pub owner_id: String,
    pub product: ProductRecord,
    pub import_batch_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
