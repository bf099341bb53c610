// ==========================================
// 价格账本 ETL - 拒收行仓储
// ==========================================
// 对齐: rejections 表（只追加）
// raw_row 以 JSON 文本存储
// ==========================================

use crate::domain::ledger::Rejection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use serde_json::Value;
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT id, ingestion_id, row_number, reason, raw_row, created_at FROM rejections";

pub struct RejectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RejectionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<Rejection> {
        let raw_text: String = row.get(4)?;
        // 历史数据若非合法 JSON，原样保留为字符串
        let raw_row = serde_json::from_str(&raw_text).unwrap_or(Value::String(raw_text));

        Ok(Rejection {
            id: row.get(0)?,
            ingestion_id: row.get(1)?,
            row_number: row.get(2)?,
            reason: row.get(3)?,
            raw_row,
            created_at: row.get(5)?,
        })
    }

    /// 追加一条拒收记录，返回新 ID
    pub fn insert(
        &self,
        ingestion_id: i64,
        row_number: usize,
        reason: &str,
        raw_row: &Value,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO rejections (ingestion_id, row_number, reason, raw_row, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                ingestion_id,
                row_number as i64,
                reason,
                raw_row.to_string(),
                Utc::now().naive_utc(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_by_ingestion(&self, ingestion_id: i64) -> RepositoryResult<Vec<Rejection>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE ingestion_id = ?1 ORDER BY row_number ASC, id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![ingestion_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 最近的拒收记录，按 ID 倒序
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<Rejection>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id DESC LIMIT ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
