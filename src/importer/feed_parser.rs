// ==========================================
// 按需印刷商城 - Feed 解析器实现
// ==========================================
// 职责: 行分类 + 商品/规格分组（纯函数,无 I/O）
// 规则:
// - 按物理行切分,每行单独读取; 引号未闭合的行整行忽略并告警
// - 首个非空行为表头; 空行跳过
// - name 非空 → 新商品起始行（先收尾当前商品）
// - name 为空且 size 非空 → 当前商品的规格续行
// - 其他行 → 忽略（可选记录告警）
// - 结束时收尾最后一个商品（不得丢失末尾记录）
// 红线: 解析本身从不报错,坏字段降级
// ==========================================

use crate::domain::{ImportWarning, ProductRecord, WarningKind};
use crate::importer::catalog_importer_trait::{FeedParser, FieldMapper as FieldMapperTrait};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::header_map::{is_blank, read_line, HeaderMap, LineRecord, Quoting};
use csv::StringRecord;
use tracing::debug;

/// 解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: u8,
    pub report_ignored_rows: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            report_ignored_rows: true,
        }
    }
}

/// 解析结果
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub header: HeaderMap,
    pub products: Vec<ProductRecord>,
    pub warnings: Vec<ImportWarning>,
}

impl ParsedFeed {
    pub fn variant_count(&self) -> usize {
        self.products.iter().map(|p| p.variants.len()).sum()
    }
}

/// 行分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    ProductStart,
    VariantContinuation,
    Blank,
    Ignored,
}

/// 按 name / size 列对数据行分类
pub fn classify_row(header: &HeaderMap, record: &StringRecord) -> RowKind {
    if header.get(record, "name").is_some() {
        RowKind::ProductStart
    } else if header.get(record, "size").is_some() {
        RowKind::VariantContinuation
    } else if is_blank(record) {
        RowKind::Blank
    } else {
        RowKind::Ignored
    }
}

/// 以默认选项解析 feed,只返回商品列表
pub fn parse(text: &str) -> Vec<ProductRecord> {
    CsvFeedParser::new().parse_feed(text, &ParseOptions::default()).products
}

// ==========================================
// CsvFeedParser
// ==========================================
pub struct CsvFeedParser {
    field_mapper: Box<dyn FieldMapperTrait>,
}

impl CsvFeedParser {
    pub fn new() -> Self {
        Self::with_field_mapper(Box::new(FieldMapper))
    }

    pub fn with_field_mapper(field_mapper: Box<dyn FieldMapperTrait>) -> Self {
        Self { field_mapper }
    }
}

impl Default for CsvFeedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedParser for CsvFeedParser {
    fn parse_feed(&self, text: &str, options: &ParseOptions) -> ParsedFeed {
        let mut header: Option<HeaderMap> = None;
        let mut products: Vec<ProductRecord> = Vec::new();
        let mut warnings: Vec<ImportWarning> = Vec::new();
        let mut current: Option<ProductRecord> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line = idx + 1;
            let LineRecord { record, quoting } = match read_line(raw_line, options.delimiter) {
                Ok(read) => read,
                Err(e) => {
                    // 行级错误不中断解析
                    warnings.push(ImportWarning::new(
                        line,
                        None,
                        WarningKind::IgnoredRow,
                        format!("无法读取该行: {}", e),
                    ));
                    continue;
                }
            };

            if header.is_none() {
                if !is_blank(&record) {
                    header = Some(HeaderMap::from_fields(record.iter()));
                }
                continue;
            }
            let Some(header_ref) = header.as_ref() else {
                continue;
            };

            if quoting == Quoting::Unterminated {
                // 之后的规格续行不再挂到上一个商品
                if let Some(done) = current.take() {
                    products.push(done);
                }
                warnings.push(ImportWarning::new(
                    line,
                    None,
                    WarningKind::IgnoredRow,
                    "引号未闭合,已忽略该行",
                ));
                continue;
            }

            match classify_row(header_ref, &record) {
                RowKind::ProductStart => {
                    if let Some(done) = current.take() {
                        products.push(done);
                    }
                    current = Some(self.field_mapper.map_product(
                        header_ref,
                        &record,
                        line,
                        &mut warnings,
                    ));
                }
                RowKind::VariantContinuation => match current.as_mut() {
                    Some(product) => {
                        let variant =
                            self.field_mapper
                                .map_variant(header_ref, &record, line, &mut warnings);
                        product.variants.push(variant);
                    }
                    None => warnings.push(ImportWarning::new(
                        line,
                        Some("size"),
                        WarningKind::OrphanVariant,
                        "规格续行之前没有商品行,已忽略",
                    )),
                },
                RowKind::Blank => {}
                RowKind::Ignored => {
                    if options.report_ignored_rows {
                        warnings.push(ImportWarning::new(
                            line,
                            None,
                            WarningKind::IgnoredRow,
                            "name 与 size 均为空,已忽略",
                        ));
                    }
                }
            }
        }

        if let Some(done) = current.take() {
            products.push(done);
        }

        let parsed = ParsedFeed {
            header: header.unwrap_or_default(),
            products,
            warnings,
        };

        debug!(
            products = parsed.products.len(),
            variants = parsed.variant_count(),
            warnings = parsed.warnings.len(),
            "feed 解析完成"
        );

        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "name,price,category,size,color\nT-shirt,16.99,textile,,\n,,,S,Noir\n,,,M,Blanc\nMug,9.99,accessoires,,";

    #[test]
    fn test_scenario_feed() {
        let products = parse(SCENARIO);
        assert_eq!(products.len(), 2);

        let tshirt = &products[0];
        assert_eq!(tshirt.name, "T-shirt");
        assert_eq!(tshirt.price, 16.99);
        assert_eq!(tshirt.category, "textile");
        assert_eq!(tshirt.variants.len(), 2);
        assert_eq!(tshirt.variants[0].size, "S");
        assert_eq!(tshirt.variants[0].color, "Noir");
        assert_eq!(tshirt.variants[1].size, "M");
        assert_eq!(tshirt.variants[1].color, "Blanc");

        let mug = &products[1];
        assert_eq!(mug.name, "Mug");
        assert_eq!(mug.price, 9.99);
        assert_eq!(mug.category, "accessoires");
        assert!(mug.variants.is_empty());
    }

    #[test]
    fn test_trailing_variant_is_kept() {
        let feed = "name,price,category,size\nSweat,30,textile,\n,,,L\n,,,XL";
        let products = parse(feed);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].variants.len(), 2);
        assert_eq!(products[0].variants[1].size, "XL");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let feed = "\nname,price,category\n\nMug,9.99,accessoires\n\n\nTasse,7,accessoires\n";
        let parsed = CsvFeedParser::new().parse_feed(feed, &ParseOptions::default());
        assert_eq!(parsed.products.len(), 2);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.header.index_of("name"), Some(0));
    }

    #[test]
    fn test_ignored_and_orphan_rows_are_reported() {
        let feed = "name,price,category,size,color\n,,,S,Rouge\n,,textile,,Bleu\nMug,9.99,accessoires,,";
        let parsed = CsvFeedParser::new().parse_feed(feed, &ParseOptions::default());

        assert_eq!(parsed.products.len(), 1);
        assert!(parsed.products[0].variants.is_empty());
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.warnings[0].kind, WarningKind::OrphanVariant);
        assert_eq!(parsed.warnings[0].line, 2);
        assert_eq!(parsed.warnings[1].kind, WarningKind::IgnoredRow);
        assert_eq!(parsed.warnings[1].line, 3);

        let quiet = ParseOptions {
            report_ignored_rows: false,
            ..ParseOptions::default()
        };
        let parsed = CsvFeedParser::new().parse_feed(feed, &quiet);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_quoted_fields_and_custom_delimiter() {
        let feed = "name;price;category;description\n\"Carnet; A5\";4.5;papeterie;\"Papier \"\"recyclé\"\"\"";
        let options = ParseOptions {
            delimiter: b';',
            ..ParseOptions::default()
        };
        let parsed = CsvFeedParser::new().parse_feed(feed, &options);
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.products[0].name, "Carnet; A5");
        assert_eq!(
            parsed.products[0].description.as_deref(),
            Some("Papier \"recyclé\"")
        );
    }

    #[test]
    fn test_unterminated_quote_stays_on_its_line() {
        let feed = "name,price,category\n\"Poster,12,deco\nMug,9.99,accessoires\nTasse,7,accessoires\nSweat,30,textile";
        let parsed = CsvFeedParser::new().parse_feed(feed, &ParseOptions::default());

        let names: Vec<&str> = parsed.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mug", "Tasse", "Sweat"]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 2);
        assert_eq!(parsed.warnings[0].kind, WarningKind::IgnoredRow);
    }

    #[test]
    fn test_variants_after_unterminated_line_are_orphans() {
        let feed = "name,price,category,size\nMug,9.99,accessoires,\n\"Sweat,30,textile,\n,,,L";
        let parsed = CsvFeedParser::new().parse_feed(feed, &ParseOptions::default());

        assert_eq!(parsed.products.len(), 1);
        assert!(parsed.products[0].variants.is_empty());
        let kinds: Vec<(usize, WarningKind)> =
            parsed.warnings.iter().map(|w| (w.line, w.kind)).collect();
        assert_eq!(
            kinds,
            vec![(3, WarningKind::IgnoredRow), (4, WarningKind::OrphanVariant)]
        );
    }

    #[test]
    fn test_quote_inside_field_is_kept() {
        let feed = "name,price,category,description\nPoster,12,deco,\"12\" tall\nMug,9.99,accessoires,";
        let parsed = CsvFeedParser::new().parse_feed(feed, &ParseOptions::default());

        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.products[0].description.as_deref(), Some("\"12\" tall"));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_classify_row() {
        let header = HeaderMap::from_fields(["name", "price", "category", "size"]);
        assert_eq!(
            classify_row(&header, &StringRecord::from(vec!["Mug", "", "", ""])),
            RowKind::ProductStart
        );
        assert_eq!(
            classify_row(&header, &StringRecord::from(vec!["", "", "", "S"])),
            RowKind::VariantContinuation
        );
        assert_eq!(
            classify_row(&header, &StringRecord::from(vec!["", " ", "", ""])),
            RowKind::Blank
        );
        assert_eq!(
            classify_row(&header, &StringRecord::from(vec!["", "3", "", ""])),
            RowKind::Ignored
        );
    }

    #[test]
    fn test_empty_feed() {
        let parsed = CsvFeedParser::new().parse_feed("", &ParseOptions::default());
        assert!(parsed.products.is_empty());
        assert!(parsed.header.is_empty());
    }
}
