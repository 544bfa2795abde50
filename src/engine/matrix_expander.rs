// ==========================================
// 按需印刷商城 - 属性矩阵展开器
// ==========================================
// 职责: 属性定义列表 → 笛卡尔积 → 规格列表
// 规则:
// - 空取值列表的属性不参与展开
// - 名为 size(s)/taille(s) 的属性 → VariantRecord.size
// - 名为 color(s)/couleur(s) 的属性 → VariantRecord.color
// - 其他属性 → attributes（原样保留）
// - 生成的规格 stock = 0, status = in_stock（需人工补全后才能售卖）
// - 组合数上限只在 MatrixExpander::new 显式指定时生效
// 红线: 输出顺序稳定（属性按传入顺序,取值按给定顺序）
// ==========================================

use crate::domain::{AttributeDefinition, VariantRecord};
use thiserror::Error;
use tracing::debug;

/// 配置缺省时 API 使用的组合数上限
pub const DEFAULT_MAX_COMBINATIONS: usize = 500;

/// 矩阵展开错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("至少需要一个非空属性")]
    NoAttributes,

    #[error("规格组合数 {count} 超过上限 {limit}")]
    TooManyCombinations { count: usize, limit: usize },
}

/// 属性在规格上的落点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeSlot {
    Size,
    Color,
    Extra,
}

fn slot_of(name: &str) -> AttributeSlot {
    let lowered = name.trim().to_lowercase();
    match lowered.as_str() {
        "size" | "sizes" | "taille" | "tailles" => AttributeSlot::Size,
        "color" | "colors" | "couleur" | "couleurs" => AttributeSlot::Color,
        _ => AttributeSlot::Extra,
    }
}

// ==========================================
// MatrixExpander
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MatrixExpander {
    max_combinations: Option<usize>, // None = 不限
}

impl MatrixExpander {
    /// 带组合数上限的展开器
    pub fn new(max_combinations: usize) -> Self {
        Self {
            max_combinations: Some(max_combinations),
        }
    }

    /// 不限组合数的展开器
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// 组合数（不展开）; 只统计非空属性
    pub fn combination_count(attributes: &[AttributeDefinition]) -> usize {
        let active: Vec<&AttributeDefinition> =
            attributes.iter().filter(|a| !a.is_inert()).collect();
        if active.is_empty() {
            return 0;
        }
        active
            .iter()
            .fold(1usize, |acc, a| acc.saturating_mul(a.values.len()))
    }

    /// 展开属性矩阵
    ///
    /// # 返回
    /// - Err(NoAttributes): 没有任何非空属性
    /// - Err(TooManyCombinations): 组合数超过上限
    pub fn expand(&self, attributes: &[AttributeDefinition]) -> Result<Vec<VariantRecord>, ExpandError> {
        let active: Vec<&AttributeDefinition> =
            attributes.iter().filter(|a| !a.is_inert()).collect();
        if active.is_empty() {
            return Err(ExpandError::NoAttributes);
        }

        let count = Self::combination_count(attributes);
        if let Some(limit) = self.max_combinations {
            if count > limit {
                return Err(ExpandError::TooManyCombinations { count, limit });
            }
        }

        let mut combinations: Vec<Vec<(&str, &str)>> = Vec::new();
        cartesian(&active, &mut Vec::with_capacity(active.len()), &mut combinations);

        let variants: Vec<VariantRecord> = combinations
            .into_iter()
            .map(|combination| to_variant(&combination))
            .collect();

        debug!(
            attributes = active.len(),
            variants = variants.len(),
            "属性矩阵展开完成"
        );
        Ok(variants)
    }
}

/// 展开属性矩阵（输出规模 = 各属性取值数之积,不设上限）
pub fn expand(attributes: &[AttributeDefinition]) -> Result<Vec<VariantRecord>, ExpandError> {
    MatrixExpander::unbounded().expand(attributes)
}

// 递归构造笛卡尔积: 每层固定一个属性的取值
fn cartesian<'a>(
    remaining: &[&'a AttributeDefinition],
    prefix: &mut Vec<(&'a str, &'a str)>,
    out: &mut Vec<Vec<(&'a str, &'a str)>>,
) {
    let Some((head, tail)) = remaining.split_first() else {
        out.push(prefix.clone());
        return;
    };

    for value in &head.values {
        prefix.push((head.name.as_str(), value.as_str()));
        cartesian(tail, prefix, out);
        prefix.pop();
    }
}

fn to_variant(combination: &[(&str, &str)]) -> VariantRecord {
    let mut variant = VariantRecord::default();
    for (name, value) in combination {
        match slot_of(name) {
            AttributeSlot::Size if variant.size.is_empty() => variant.size = value.to_string(),
            AttributeSlot::Color if variant.color.is_empty() => variant.color = value.to_string(),
            _ => {
                variant
                    .attributes
                    .insert(name.to_string(), value.to_string());
            }
        }
    }
    variant
}
