// ==========================================
// 并发导入测试
// ==========================================
// 测试目标: 编号分配竞争的可见性与 STORE_SEQUENCE 策略
// ==========================================


use pod_catalog_import::config::{config_keys, ConfigManager};
use pod_catalog_import::domain::{CallerIdentity, ProductRecord};
use pod_catalog_import::engine::IdentifierAllocator;
use pod_catalog_import::importer::{CatalogImporter, CatalogImporterImpl};
use pod_catalog_import::logging;
use pod_catalog_import::repository::{CatalogStore, CatalogStoreImpl, RepositoryError};
use rusqlite::Connection;
use std::collections::HashSet;
use test_helpers::{create_test_db, insert_test_config};

/// 创建测试用的 CatalogImporter
fn create_test_importer(db_path: &str) -> CatalogImporterImpl<CatalogStoreImpl, ConfigManager> {
    let store = CatalogStoreImpl::new(db_path).expect("Failed to create store");
    let config = ConfigManager::new(db_path).expect("Failed to create config");
    CatalogImporterImpl::new(store, config)
}

fn feed_of(prefix: &str, count: usize) -> String {
    let mut text = String::from("name,price,category,size\n");
    for i in 0..count {
        text.push_str(&format!("{prefix} {i},10.00,textile,\n,,,M\n"));
    }
    text
}

#[tokio::test]
async fn test_read_then_increment_race_is_visible() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store_a = CatalogStoreImpl::new(&db_path).unwrap();
    let store_b = CatalogStoreImpl::new(&db_path).unwrap();
    let alice = CallerIdentity::new("alice");
    let bob = CallerIdentity::new("bob");

    // 两个客户端在任何写入之前读取最大编号
    let id_a = IdentifierAllocator::new(&store_a).next_id(&alice).await.unwrap();
    let id_b = IdentifierAllocator::new(&store_b).next_id(&bob).await.unwrap();
    assert_eq!(id_a, id_b);

    store_a
        .insert_product(id_a, &alice, &ProductRecord::new("Mug A", 9.0, "accessoires"), None)
        .await
        .unwrap();
    let err = store_b
        .insert_product(id_b, &bob, &ProductRecord::new("Mug B", 9.0, "accessoires"), None)
        .await
        .unwrap_err();

    // 冲突以记录级错误暴露,不覆盖已有记录
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    let kept = store_a.find_product(id_a).await.unwrap().unwrap();
    assert_eq!(kept.product.name, "Mug A");
    assert_eq!(kept.owner_id, "alice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_client_sequential_never_overwrites() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let mut handles = Vec::new();
    for owner in ["alice", "bob", "carol"] {
        let db_path = db_path.clone();
        handles.push(tokio::spawn(async move {
            let importer = create_test_importer(&db_path);
            importer
                .run(&feed_of(owner, 10), Some(&CallerIdentity::new(owner)))
                .await
                .unwrap()
        }));
    }

    let mut reports = Vec::new();
    for handle in handles {
        reports.push(handle.await.unwrap());
    }

    let store = CatalogStoreImpl::new(&db_path).unwrap();
    let persisted = store.count_products().await.unwrap();
    let successes: usize = reports.iter().map(|r| r.status.success()).sum();
    let failures: usize = reports.iter().map(|r| r.status.failed()).sum();

    // 每条记录恰好尝试一次; 成功数与库内记录数一致
    assert_eq!(successes + failures, 30);
    assert_eq!(successes, persisted);

    let all_ids: Vec<i64> = reports.iter().flat_map(|r| r.assigned_ids.clone()).collect();
    let unique: HashSet<i64> = all_ids.iter().copied().collect();
    assert_eq!(unique.len(), all_ids.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_store_sequence_has_no_collisions() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = Connection::open(&db_path).unwrap();
    insert_test_config(&conn, config_keys::ID_STRATEGY, "STORE_SEQUENCE").unwrap();
    drop(conn);

    let mut handles = Vec::new();
    for owner in ["alice", "bob", "carol"] {
        let db_path = db_path.clone();
        handles.push(tokio::spawn(async move {
            let importer = create_test_importer(&db_path);
            importer
                .run(&feed_of(owner, 10), Some(&CallerIdentity::new(owner)))
                .await
                .unwrap()
        }));
    }

    let mut all_ids = Vec::new();
    for handle in handles {
        let report = handle.await.unwrap();
        assert_eq!(report.status.success(), 10);
        assert_eq!(report.status.failed(), 0);

        // 单次导入内编号严格递增
        assert!(report.assigned_ids.windows(2).all(|w| w[0] < w[1]));
        all_ids.extend(report.assigned_ids);
    }

    all_ids.sort_unstable();
    assert_eq!(all_ids, (1..=30).collect::<Vec<i64>>());

    let store = CatalogStoreImpl::new(&db_path).unwrap();
    assert_eq!(store.count_products().await.unwrap(), 30);
    assert_eq!(
        store
            .list_products_by_owner(&CallerIdentity::new("bob"))
            .await
            .unwrap()
            .len(),
        10
    );
}
