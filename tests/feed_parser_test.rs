// ==========================================
// Feed 解析器集成测试
// ==========================================
// 测试目标: 行分类、商品/规格分组、告警与别名表头
// ==========================================


use pod_catalog_import::domain::{ProductStatus, VariantStatus, WarningKind};
use pod_catalog_import::importer::{parse, CsvFeedParser, FeedParser, ParseOptions};
use pod_catalog_import::logging;

#[test]
fn test_scenario_feed_groups_variants() {
    logging::init_test();

    let text = test_helpers::read_fixture("scenario_feed.csv");
    let products = parse(&text);

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
    assert!(mug.variants.is_empty());
}

#[test]
fn test_row_count_invariant() {
    let text = test_helpers::read_fixture("five_products.csv");
    let parsed = CsvFeedParser::new().parse_feed(&text, &ParseOptions::default());

    // 5 个商品行, 4 个规格续行
    assert_eq!(parsed.products.len(), 5);
    assert_eq!(parsed.variant_count(), 4);
    assert!(parsed.warnings.is_empty());

    let names: Vec<&str> = parsed.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["T-shirt Bio", "Sweat Capuche", "Casquette", "Mug Céramique", "Tote Bag"]
    );

    let tshirt = &parsed.products[0];
    assert_eq!(tshirt.status, ProductStatus::Published);
    assert!(tshirt.is_customizable);
    assert_eq!(tshirt.subcategory.as_deref(), Some("homme"));
    assert_eq!(tshirt.variants[0].hex_color, "#000000");
    assert_eq!(tshirt.total_stock(), 20);

    // 末尾商品及其规格不丢失
    let tote = &parsed.products[4];
    assert_eq!(tote.status, ProductStatus::Archived);
    assert_eq!(tote.variants.len(), 1);
    assert_eq!(tote.variants[0].stock, 40);
}

#[test]
fn test_malformed_feed_degrades_with_warnings() {
    let text = test_helpers::read_fixture("malformed_feed.csv");
    let parsed = CsvFeedParser::new().parse_feed(&text, &ParseOptions::default());

    assert_eq!(parsed.products.len(), 2);

    let poster = &parsed.products[0];
    assert_eq!(poster.name, "Poster");
    assert_eq!(poster.price, 0.0);

    let affiche = &parsed.products[1];
    assert_eq!(affiche.status, ProductStatus::Draft);
    assert_eq!(affiche.original_price, Some(12.0));
    assert_eq!(affiche.variants.len(), 2);

    let a3 = &affiche.variants[0];
    assert_eq!(a3.stock, 0);
    assert_eq!(a3.price_adjustment, 1.5);
    assert_eq!(a3.status, VariantStatus::LowStock);
    assert!((a3.unit_price(affiche) - 16.4).abs() < 1e-9);

    let a2 = &affiche.variants[1];
    assert_eq!(a2.stock, 0);
    assert_eq!(a2.price_adjustment, 0.0);
    assert_eq!(a2.status, VariantStatus::OutOfStock);

    let summary: Vec<(usize, WarningKind)> =
        parsed.warnings.iter().map(|w| (w.line, w.kind)).collect();
    assert_eq!(
        summary,
        vec![
            (2, WarningKind::OrphanVariant),
            (3, WarningKind::MalformedNumber),
            (4, WarningKind::UnknownEnumValue),
            (5, WarningKind::NegativeStock),
            (6, WarningKind::MalformedNumber),
            (6, WarningKind::MalformedNumber),
            (7, WarningKind::IgnoredRow),
        ]
    );
}

#[test]
fn test_ignored_rows_can_be_silenced() {
    let text = test_helpers::read_fixture("malformed_feed.csv");
    let options = ParseOptions {
        report_ignored_rows: false,
        ..ParseOptions::default()
    };
    let parsed = CsvFeedParser::new().parse_feed(&text, &options);

    assert!(parsed
        .warnings
        .iter()
        .all(|w| w.kind != WarningKind::IgnoredRow));
    // 孤立规格行始终报告
    assert!(parsed
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::OrphanVariant));
}

#[test]
fn test_french_headers_and_quoted_fields() {
    let text = test_helpers::read_fixture("imprimerie.csv");
    let options = ParseOptions {
        delimiter: b';',
        ..ParseOptions::default()
    };
    let parsed = CsvFeedParser::new().parse_feed(&text, &options);

    assert!(parsed.header.contains("name"));
    assert!(parsed.header.missing_required().is_empty());
    assert_eq!(parsed.products.len(), 2);

    let flyer = &parsed.products[0];
    assert_eq!(flyer.name, "Flyer");
    assert_eq!(flyer.price, 25.0);
    assert_eq!(flyer.description.as_deref(), Some("Flyer recto; verso"));
    assert_eq!(flyer.variants.len(), 2);
    assert_eq!(flyer.variants[0].size, "A5");
    assert_eq!(
        flyer.variants[0].attributes.get("poids").map(String::as_str),
        Some("135g")
    );
    assert_eq!(
        flyer.variants[1].attributes.get("bat").map(String::as_str),
        Some("non")
    );

    let carte = &parsed.products[1];
    assert_eq!(carte.description.as_deref(), Some("Carte \"premium\" pelliculée"));
    assert_eq!(
        carte.variants[0].attributes.get("quantite").map(String::as_str),
        Some("1000")
    );
}

#[test]
fn test_header_only_and_empty_feeds() {
    assert!(parse("").is_empty());
    assert!(parse("name,price,category\n").is_empty());
    assert!(parse("\n\nname,price,category\n\n").is_empty());
}
