// ==========================================
// 价格账本 ETL - 价格查询仓储（读侧）
// ==========================================
// 职责: 最新报价、历史序列
// 最新口径: 同一 (产品, 供应商) 取 observed_at 最大者，同刻取 ID 最大者
// ==========================================

use crate::domain::ledger::Price;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::price_repo::PriceRepository;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

const LATEST_PER_VENDOR_SQL: &str = r#"
    SELECT p.id, p.product_id, p.vendor_id, p.observed_at, p.currency, p.price, p.price_aed,
           p.source_ingestion_id
    FROM prices p
    WHERE p.id = (
        SELECT p2.id FROM prices p2
        WHERE p2.product_id = p.product_id AND p2.vendor_id = p.vendor_id
        ORDER BY p2.observed_at DESC, p2.id DESC
        LIMIT 1
    )
"#;

pub struct PriceQueryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PriceQueryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 全部 (产品, 供应商) 的最新报价，按产品、结算价升序
    pub fn latest_per_product_vendor(&self) -> RepositoryResult<Vec<Price>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} ORDER BY p.product_id ASC, p.price_aed ASC, p.vendor_id ASC",
            LATEST_PER_VENDOR_SQL
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], PriceRepository::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 单个产品各供应商的最新报价，按结算价升序
    pub fn latest_for_product(&self, product_id: &str) -> RepositoryResult<Vec<Price>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} AND p.product_id = ?1 ORDER BY p.price_aed ASC, p.vendor_id ASC",
            LATEST_PER_VENDOR_SQL
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![product_id], PriceRepository::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 单个产品的全部价格点，按观测时间升序
    pub fn history(&self, product_id: &str) -> RepositoryResult<Vec<Price>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, product_id, vendor_id, observed_at, currency, price, price_aed, source_ingestion_id
            FROM prices
            WHERE product_id = ?1
            ORDER BY observed_at ASC, id ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![product_id], PriceRepository::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
