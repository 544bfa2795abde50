// ==========================================
// ImportApi 集成测试
// ==========================================
// 测试目标: API 门面的响应结构、错误转换与本地化摘要
// ==========================================


use pod_catalog_import::api::{ApiError, ImportApi};
use pod_catalog_import::config::config_keys;
use pod_catalog_import::domain::AttributeDefinition;
use pod_catalog_import::i18n;
use pod_catalog_import::logging;
use rusqlite::Connection;
use std::sync::Mutex;
use test_helpers::{create_test_db, insert_test_config};

// 摘要依赖全局 locale,涉及 locale 的测试串行执行
static LOCALE_LOCK: Mutex<()> = Mutex::new(());

#[tokio::test]
async fn test_import_catalog_response() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path);

    let text = test_helpers::read_fixture("scenario_feed.csv");
    let response = api.import_catalog(&text, Some("atelier-42")).await.unwrap();

    assert_eq!(response.total, 2);
    assert_eq!(response.success, 2);
    assert_eq!(response.failed, 0);
    assert_eq!(response.assigned_ids, vec![1, 2]);
    assert!(!response.batch_id.is_empty());

    // 响应可直接序列化给调用方
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["total"], 2);
    assert!(json["summary"].as_str().is_some());

    let product = api.get_product(1).await.unwrap();
    assert_eq!(product.product.name, "T-shirt");

    let owned = api.list_products_by_owner("atelier-42").await.unwrap();
    assert_eq!(owned.len(), 2);
    assert!(api.list_products_by_owner("someone-else").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_summary_is_localized() {
    logging::init_test();
    let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path);
    let text = test_helpers::read_fixture("scenario_feed.csv");

    i18n::set_locale("en");
    let response = api.import_catalog(&text, Some("atelier-42")).await.unwrap();
    assert_eq!(
        response.summary,
        "Import finished: 2/2 products saved, 0 failed, 0 warnings"
    );

    i18n::set_locale("fr");
    let response = api.import_catalog(&text, Some("atelier-42")).await.unwrap();
    assert!(response.summary.starts_with("Import terminé : 2/2"));

    i18n::set_locale(i18n::DEFAULT_LOCALE);
}

#[tokio::test]
async fn test_errors_are_mapped() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path);
    let text = test_helpers::read_fixture("scenario_feed.csv");

    let err = api.import_catalog(&text, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    let err = api
        .import_catalog("title,price\nMug,9.99\n", Some("atelier-42"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    let err = api.get_product(404).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = api
        .import_catalog_file("tests/fixtures/missing.csv", Some("atelier-42"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = api.import_catalog_file("  ", Some("atelier-42")).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_expand_variants_respects_configured_limit() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path.clone());

    let attributes = vec![
        AttributeDefinition::new("size", ["S", "M", "L"]),
        AttributeDefinition::new("color", ["Noir", "Blanc"]),
    ];
    let variants = api.expand_variants(&attributes).await.unwrap();
    assert_eq!(variants.len(), 6);

    let conn = Connection::open(&db_path).unwrap();
    insert_test_config(&conn, config_keys::MAX_VARIANT_COMBINATIONS, "4").unwrap();

    let err = api.expand_variants(&attributes).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api.expand_variants(&[]).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
