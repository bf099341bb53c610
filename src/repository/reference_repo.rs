// ==========================================
// 价格账本 ETL - 供应商 / 产品参考数据仓储
// ==========================================
// 对齐: vendors / products 表
// 写入仅供种子流程使用（INSERT OR IGNORE，幂等）
// ==========================================

use crate::domain::reference::{Product, Vendor};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

pub struct ReferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReferenceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_product(row: &Row) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            canonical_name: row.get(1)?,
            category: row.get(2)?,
        })
    }

    // ===== 供应商 =====

    /// 插入供应商（已存在则忽略），返回是否新增
    pub fn insert_vendor_if_absent(&self, vendor: &Vendor) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO vendors (id, name, default_currency) VALUES (?1, ?2, ?3)",
            params![vendor.id, vendor.name, vendor.default_currency],
        )?;
        Ok(inserted > 0)
    }

    pub fn list_vendors(&self) -> RepositoryResult<Vec<Vendor>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, default_currency FROM vendors ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Vendor {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    default_currency: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ===== 产品 =====

    pub fn insert_product_if_absent(&self, product: &Product) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO products (id, canonical_name, category) VALUES (?1, ?2, ?3)",
            params![product.id, product.canonical_name, product.category],
        )?;
        Ok(inserted > 0)
    }

    /// 全部产品，按品类、ID 排序
    pub fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, canonical_name, category FROM products ORDER BY category ASC, id ASC",
        )?;
        let rows = stmt
            .query_map([], Self::map_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn find_product(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                "SELECT id, canonical_name, category FROM products WHERE id = ?1",
                params![product_id],
                Self::map_product,
            )
            .optional()?;
        Ok(product)
    }
}
