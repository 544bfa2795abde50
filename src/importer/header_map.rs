// ==========================================
// 按需印刷商城 - 表头映射
// ==========================================
// 职责: 首行表头 → 列名/列号查找表
// 红线: 必须包含 name / price / category,否则整批拒绝
// ==========================================

use crate::importer::error::ImportResult;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;

/// 必需表头
pub const REQUIRED_HEADERS: [&str; 3] = ["name", "price", "category"];

/// 规格行上的业务属性列（原样透传到 VariantRecord.attributes）
pub const DOMAIN_ATTRIBUTE_COLUMNS: [&str; 9] = [
    "format",
    "poids",
    "quantite",
    "echantillon",
    "types_impression",
    "type_de_materiaux",
    "details_impression",
    "orientation_impression",
    "bat",
];

/// 列名别名 → 标准列名
fn canonical_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let canonical = match lowered.as_str() {
        "nom" => "name",
        "prix" => "price",
        "categorie" | "catégorie" => "category",
        "taille" => "size",
        "couleur" => "color",
        "couleur_hex" => "hex_color",
        other => other,
    };
    canonical.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl HeaderMap {
    /// 由表头字段构造（字段已 trim;重复列名以首次出现为准）
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = fields
            .into_iter()
            .map(|f| canonical_name(f.as_ref()))
            .collect();

        let mut index = HashMap::new();
        for (idx, column) in columns.iter().enumerate() {
            if !column.is_empty() {
                index.entry(column.clone()).or_insert(idx);
            }
        }

        Self { columns, index }
    }

    /// 读取 feed 的首个非空行作为表头
    ///
    /// # 返回
    /// - Ok(HeaderMap): 空 feed 返回空表头（由调用方判定缺列）
    pub fn from_feed(text: &str, delimiter: u8) -> ImportResult<Self> {
        for line in text.lines() {
            let LineRecord { record, .. } = read_line(line, delimiter)?;
            if is_blank(&record) {
                continue;
            }
            return Ok(Self::from_fields(record.iter()));
        }

        Ok(Self::default())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// 缺失的必需表头（按 REQUIRED_HEADERS 顺序）
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_HEADERS
            .iter()
            .filter(|h| !self.contains(h))
            .map(|h| h.to_string())
            .collect()
    }

    /// 取该行某列的值（列不存在或值为空 → None）
    pub fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.index_of(column)
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// 所有字段均为空白的行
pub(crate) fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}

// ==========================================
// 单行读取
// ==========================================
// feed 先按物理行切分,每行各用一个 reader,
// 坏引号只影响本行

/// 单行引号状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quoting {
    /// 无引号,或引号成对且包住整个字段
    Intact,
    /// 闭合引号后仍有内容（如 `"12" tall`）→ 按字面读取
    Literal,
    /// 引号未闭合
    Unterminated,
}

#[derive(Clone, Copy)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteSeen,
    AfterQuote,
}

/// 扫描一行的引号是否符合 CSV 规则
pub(crate) fn scan_quoting(line: &str, delimiter: u8) -> Quoting {
    let mut state = ScanState::FieldStart;
    for &b in line.as_bytes() {
        state = match (state, b) {
            (ScanState::FieldStart, b'"') => ScanState::Quoted,
            (ScanState::FieldStart | ScanState::Unquoted, _) if b == delimiter => {
                ScanState::FieldStart
            }
            (ScanState::FieldStart | ScanState::Unquoted, _) => ScanState::Unquoted,
            (ScanState::Quoted, b'"') => ScanState::QuoteSeen,
            (ScanState::Quoted, _) => ScanState::Quoted,
            (ScanState::QuoteSeen, b'"') => ScanState::Quoted, // "" 转义
            (ScanState::QuoteSeen | ScanState::AfterQuote, _) if b == delimiter => {
                ScanState::FieldStart
            }
            (ScanState::QuoteSeen | ScanState::AfterQuote, b' ' | b'\t') => ScanState::AfterQuote,
            (ScanState::QuoteSeen | ScanState::AfterQuote, _) => return Quoting::Literal,
        };
    }

    if matches!(state, ScanState::Quoted) {
        Quoting::Unterminated
    } else {
        Quoting::Intact
    }
}

/// 单行读取结果
#[derive(Debug, Clone)]
pub(crate) struct LineRecord {
    pub record: StringRecord,
    pub quoting: Quoting,
}

/// 读取一个物理行
///
/// 引号完好的行按 CSV 引号规则解析; 其余按字面切分（保留引号字符）
pub(crate) fn read_line(line: &str, delimiter: u8) -> ImportResult<LineRecord> {
    let quoting = scan_quoting(line, delimiter);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .quoting(quoting == Quoting::Intact)
        .from_reader(line.as_bytes());

    let record = match reader.records().next() {
        Some(result) => result?,
        None => StringRecord::new(),
    };

    Ok(LineRecord { record, quoting })
}
