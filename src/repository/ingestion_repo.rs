// ==========================================
// 价格账本 ETL - 上传文件登记仓储
// ==========================================
// 对齐: raw_ingestions 表
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::domain::ledger::RawIngestion;
use crate::domain::types::IngestionStatus;
use crate::repository::error::{conversion_failure, RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT id, vendor_id, file_name, stored_path, ingested_at, status, message FROM raw_ingestions";

// ==========================================
// IngestionRepository
// ==========================================
pub struct IngestionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl IngestionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<RawIngestion> {
        let status_raw: String = row.get(5)?;
        let status = IngestionStatus::parse(&status_raw)
            .ok_or_else(|| conversion_failure(5, "status", &status_raw))?;

        Ok(RawIngestion {
            id: row.get(0)?,
            vendor_id: row.get(1)?,
            file_name: row.get(2)?,
            stored_path: row.get(3)?,
            ingested_at: row.get(4)?,
            status,
            message: row.get(6)?,
        })
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 登记一个待处理文件（status = PENDING）
    ///
    /// # 返回
    /// - Ok(id): 新记录 ID
    pub fn insert_pending(
        &self,
        vendor_id: &str,
        file_name: &str,
        stored_path: &str,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO raw_ingestions (vendor_id, file_name, stored_path, ingested_at, status)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                vendor_id,
                file_name,
                stored_path,
                Utc::now().naive_utc(),
                IngestionStatus::Pending.as_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// PENDING → PROCESSED / FAILED
    ///
    /// 仅允许从 PENDING 迁移，且只迁移一次
    pub fn mark_finished(
        &self,
        id: i64,
        status: IngestionStatus,
        message: &str,
    ) -> RepositoryResult<()> {
        if status == IngestionStatus::Pending {
            return Err(RepositoryError::InvalidStateTransition {
                from: IngestionStatus::Pending.to_string(),
                to: status.to_string(),
            });
        }

        let conn = self.get_conn()?;
        let updated = conn.execute(
            "UPDATE raw_ingestions SET status = ?1, message = ?2 WHERE id = ?3 AND status = ?4",
            params![status.as_str(), message, id, IngestionStatus::Pending.as_str()],
        )?;

        if updated == 0 {
            let current: Option<String> = conn
                .query_row(
                    "SELECT status FROM raw_ingestions WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;
            return Err(match current {
                Some(from) => RepositoryError::InvalidStateTransition {
                    from,
                    to: status.to_string(),
                },
                None => RepositoryError::NotFound {
                    entity: "RawIngestion".to_string(),
                    id: id.to_string(),
                },
            });
        }

        Ok(())
    }

    /// 重新排队: 删除该文件已产出的价格与拒收记录，并重置为 PENDING
    ///
    /// # 返回
    /// - Ok((deleted_prices, deleted_rejections))
    pub fn requeue(&self, id: i64) -> RepositoryResult<(usize, usize)> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let exists: Option<i64> = tx
            .query_row("SELECT id FROM raw_ingestions WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "RawIngestion".to_string(),
                id: id.to_string(),
            });
        }

        let deleted_prices =
            tx.execute("DELETE FROM prices WHERE source_ingestion_id = ?1", params![id])?;
        let deleted_rejections =
            tx.execute("DELETE FROM rejections WHERE ingestion_id = ?1", params![id])?;
        tx.execute(
            "UPDATE raw_ingestions SET status = ?1, message = NULL WHERE id = ?2",
            params![IngestionStatus::Pending.as_str(), id],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok((deleted_prices, deleted_rejections))
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<RawIngestion>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let found = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(found)
    }

    /// 待处理文件，按 ID 升序
    pub fn list_pending(&self) -> RepositoryResult<Vec<RawIngestion>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE status = ?1 ORDER BY id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![IngestionStatus::Pending.as_str()], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 最近登记的文件，按 ID 倒序
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<RawIngestion>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id DESC LIMIT ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
