// ==========================================
// 价格账本 ETL - 价格账本仓储
// ==========================================
// 对齐: prices 表（只追加）
// ==========================================

use crate::domain::ledger::{NewPrice, Price};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct PriceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PriceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub(crate) fn map_row(row: &Row) -> rusqlite::Result<Price> {
        Ok(Price {
            id: row.get(0)?,
            product_id: row.get(1)?,
            vendor_id: row.get(2)?,
            observed_at: row.get(3)?,
            currency: row.get(4)?,
            price: row.get(5)?,
            price_aed: row.get(6)?,
            source_ingestion_id: row.get(7)?,
        })
    }

    /// 追加一条价格记录，返回新 ID
    pub fn insert(&self, price: &NewPrice) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO prices (
                product_id, vendor_id, observed_at, currency, price, price_aed, source_ingestion_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                price.product_id,
                price.vendor_id,
                price.observed_at,
                price.currency,
                price.price,
                price.price_aed,
                price.source_ingestion_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 某个上传文件产出的全部价格，按 ID 升序
    pub fn list_by_ingestion(&self, ingestion_id: i64) -> RepositoryResult<Vec<Price>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, product_id, vendor_id, observed_at, currency, price, price_aed, source_ingestion_id
            FROM prices
            WHERE source_ingestion_id = ?1
            ORDER BY id ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![ingestion_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM prices", [], |row| row.get(0))?;
        Ok(count)
    }
}
