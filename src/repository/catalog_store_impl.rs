// ==========================================
// 按需印刷商城 - Catalog Store 实现
// ==========================================
// 职责: 实现商品目录存储（使用 rusqlite）
// 红线: 一个商品 + 其规格 = 一条 INSERT,不存在"半条"商品
// 红线: 编号冲突必须报错,不允许 INSERT OR REPLACE 静默覆盖
// ==========================================

use crate::db::{configure_sqlite_connection, init_catalog_schema, open_sqlite_connection};
use crate::domain::{CallerIdentity, ProductRecord, ProductStatus, StoredProduct, VariantRecord};
use crate::repository::catalog_store::CatalogStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const SELECT_COLUMNS: &str = r#"
    product_id, owner_id, name, price, original_price, category, subcategory,
    description, status, is_customizable, image, variants_json, import_batch_id, created_at
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO catalog_product (
        product_id, owner_id, name, price, original_price, category, subcategory,
        description, status, is_customizable, image, variants_json, import_batch_id, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
"#;

// ==========================================
// CatalogStoreImpl
// ==========================================
pub struct CatalogStoreImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogStoreImpl {
    /// 创建新的 Store 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_catalog_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 Store
    ///
    /// 说明：对传入连接再次应用统一 PRAGMA 与建表（均幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_catalog_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_authenticated(caller: &CallerIdentity) -> RepositoryResult<()> {
        if caller.is_authenticated() {
            Ok(())
        } else {
            Err(RepositoryError::Unauthenticated(
                "写入/查询目录需要已认证的调用方".to_string(),
            ))
        }
    }

    fn execute_insert(
        conn: &Connection,
        product_id: i64,
        owner: &CallerIdentity,
        product: &ProductRecord,
        batch_id: Option<&str>,
    ) -> RepositoryResult<()> {
        let variants_json = serde_json::to_string(&product.variants)?;

        conn.execute(
            INSERT_SQL,
            params![
                product_id.to_string(),
                owner.user_id,
                product.name,
                product.price,
                product.original_price,
                product.category,
                product.subcategory,
                product.description,
                product.status.to_string(),
                product.is_customizable,
                product.image,
                variants_json,
                batch_id,
                Utc::now(),
            ],
        )?;

        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
        Ok(StoredRow {
            product_id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            price: row.get(3)?,
            original_price: row.get(4)?,
            category: row.get(5)?,
            subcategory: row.get(6)?,
            description: row.get(7)?,
            status: row.get(8)?,
            is_customizable: row.get(9)?,
            image: row.get(10)?,
            variants_json: row.get(11)?,
            import_batch_id: row.get(12)?,
            created_at: row.get(13)?,
        })
    }
}

// 数据库行（未解码 JSON / 枚举）
struct StoredRow {
    product_id: String,
    owner_id: String,
    name: String,
    price: f64,
    original_price: Option<f64>,
    category: String,
    subcategory: Option<String>,
    description: Option<String>,
    status: String,
    is_customizable: bool,
    image: Option<String>,
    variants_json: String,
    import_batch_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl StoredRow {
    fn into_stored_product(self) -> RepositoryResult<StoredProduct> {
        let product_id = self.product_id.trim().parse::<i64>().map_err(|_| {
            RepositoryError::ValidationError(format!("非整数商品编号: {}", self.product_id))
        })?;
        let status = self
            .status
            .parse::<ProductStatus>()
            .map_err(RepositoryError::ValidationError)?;
        let variants: Vec<VariantRecord> = serde_json::from_str(&self.variants_json)?;

        Ok(StoredProduct {
            product_id,
            owner_id: self.owner_id,
            product: ProductRecord {
                name: self.name,
                price: self.price,
                category: self.category,
                original_price: self.original_price,
                subcategory: self.subcategory,
                description: self.description,
                status,
                is_customizable: self.is_customizable,
                image: self.image,
                variants,
                line_number: 0,
            },
            import_batch_id: self.import_batch_id,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl CatalogStore for CatalogStoreImpl {
    async fn insert_product(
        &self,
        product_id: i64,
        owner: &CallerIdentity,
        product: &ProductRecord,
        batch_id: Option<&str>,
    ) -> RepositoryResult<()> {
        Self::ensure_authenticated(owner)?;

        let conn = self.lock()?;
        Self::execute_insert(&conn, product_id, owner, product, batch_id)?;

        debug!(product_id, name = %product.name, variants = product.variants.len(), "商品已写入");
        Ok(())
    }

    async fn insert_product_with_next_id(
        &self,
        owner: &CallerIdentity,
        product: &ProductRecord,
        batch_id: Option<&str>,
    ) -> RepositoryResult<i64> {
        Self::ensure_authenticated(owner)?;

        let mut conn = self.lock()?;
        // IMMEDIATE: 读最大编号与插入在同一写锁内完成
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let next_id: i64 = tx.query_row(
            "SELECT COALESCE(MAX(CAST(product_id AS INTEGER)), 0) + 1 FROM catalog_product",
            [],
            |row| row.get(0),
        )?;
        let next_id = next_id.max(1);

        Self::execute_insert(&tx, next_id, owner, product, batch_id)?;
        tx.commit()?;

        debug!(product_id = next_id, name = %product.name, "商品已写入（存储端编号）");
        Ok(next_id)
    }

    async fn select_max_id(&self, caller: &CallerIdentity) -> RepositoryResult<Option<String>> {
        Self::ensure_authenticated(caller)?;

        let conn = self.lock()?;
        let raw = conn
            .query_row(
                "SELECT product_id FROM catalog_product ORDER BY CAST(product_id AS INTEGER) DESC LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(raw)
    }

    async fn find_product(&self, product_id: i64) -> RepositoryResult<Option<StoredProduct>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM catalog_product WHERE product_id = ?1",
            SELECT_COLUMNS
        );

        let row = conn
            .query_row(&sql, params![product_id.to_string()], Self::map_row)
            .optional()?;

        row.map(StoredRow::into_stored_product).transpose()
    }

    async fn list_products_by_owner(
        &self,
        owner: &CallerIdentity,
    ) -> RepositoryResult<Vec<StoredProduct>> {
        Self::ensure_authenticated(owner)?;

        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM catalog_product WHERE owner_id = ?1 ORDER BY CAST(product_id AS INTEGER)",
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![owner.user_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(StoredRow::into_stored_product)
            .collect()
    }

    async fn count_products(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM catalog_product", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
