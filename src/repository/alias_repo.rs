// ==========================================
// 价格账本 ETL - 产品别名仓储
// ==========================================
// 对齐: product_aliases 表，(vendor_id, vendor_sku) 唯一
// 匹配口径: 精确匹配，区分大小写
// ==========================================

use crate::domain::reference::ProductAlias;
use crate::engine::alias_resolver::AliasLookup;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct ProductAliasRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductAliasRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert_if_absent(&self, alias: &ProductAlias) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO product_aliases (vendor_id, vendor_sku, product_id, vendor_name_raw)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                alias.vendor_id,
                alias.vendor_sku,
                alias.product_id,
                alias.vendor_name_raw,
            ],
        )?;
        Ok(inserted > 0)
    }

    pub fn find_product_id(&self, vendor_id: &str, vendor_sku: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let product_id = conn
            .query_row(
                "SELECT product_id FROM product_aliases WHERE vendor_id = ?1 AND vendor_sku = ?2",
                params![vendor_id, vendor_sku],
                |row| row.get(0),
            )
            .optional()?;
        Ok(product_id)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM product_aliases", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl AliasLookup for ProductAliasRepository {
    fn find_product_id(&self, vendor_id: &str, vendor_sku: &str) -> RepositoryResult<Option<String>> {
        ProductAliasRepository::find_product_id(self, vendor_id, vendor_sku)
    }
}
