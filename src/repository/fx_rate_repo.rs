// ==========================================
// 价格账本 ETL - 汇率仓储
// ==========================================
// 对齐: fx_rates 表，(fx_date, base, quote) 唯一
// fx_date 按当日零点存储，按自然日等值查找
// ==========================================

use crate::domain::reference::FxRate;
use crate::engine::fx_converter::FxRateLookup;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 自然日 → 存储口径（当日零点）
pub fn fx_day_key(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

pub struct FxRateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FxRateRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert_if_absent(&self, rate: &FxRate) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO fx_rates (fx_date, base_currency, quote_currency, rate)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                fx_day_key(rate.fx_date),
                rate.base_currency,
                rate.quote_currency,
                rate.rate,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// 查询 base → quote 在指定自然日的汇率
    pub fn find_rate(&self, date: NaiveDate, base: &str, quote: &str) -> RepositoryResult<Option<f64>> {
        let conn = self.get_conn()?;
        let rate = conn
            .query_row(
                r#"
                SELECT rate FROM fx_rates
                WHERE fx_date = ?1 AND base_currency = ?2 AND quote_currency = ?3
                "#,
                params![fx_day_key(date), base, quote],
                |row| row.get(0),
            )
            .optional()?;
        Ok(rate)
    }
}

impl FxRateLookup for FxRateRepository {
    fn find_rate(&self, date: NaiveDate, base: &str, quote: &str) -> RepositoryResult<Option<f64>> {
        FxRateRepository::find_rate(self, date, base, quote)
    }
}
