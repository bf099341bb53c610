// ==========================================
// 价格账本 ETL - 运行记录仓储
// ==========================================
// 对齐: etl_runs 表
// 状态机: RUNNING → {DONE, PARTIAL}
// ==========================================

use crate::domain::ledger::{EtlRun, RunSummary};
use crate::domain::types::RunStatus;
use crate::repository::error::{conversion_failure, RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

pub struct RunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RunRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<EtlRun> {
        let status_raw: String = row.get(3)?;
        let status = RunStatus::parse(&status_raw)
            .ok_or_else(|| conversion_failure(3, "status", &status_raw))?;

        Ok(EtlRun {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            status,
            processed_ingestions: row.get(4)?,
            loaded_rows: row.get(5)?,
            rejected_rows: row.get(6)?,
        })
    }

    /// 开启一次运行（status = RUNNING，计数为 0）
    pub fn create_running(&self, started_at: NaiveDateTime) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO etl_runs (started_at, status, processed_ingestions, loaded_rows, rejected_rows)
            VALUES (?1, ?2, 0, 0, 0)
            "#,
            params![started_at, RunStatus::Running.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 写入最终状态与计数（仅允许从 RUNNING 结束一次）
    pub fn finalize(
        &self,
        summary: &RunSummary,
        finished_at: NaiveDateTime,
    ) -> RepositoryResult<()> {
        if summary.status == RunStatus::Running {
            return Err(RepositoryError::InvalidStateTransition {
                from: RunStatus::Running.to_string(),
                to: summary.status.to_string(),
            });
        }

        let conn = self.get_conn()?;
        let updated = conn.execute(
            r#"
            UPDATE etl_runs
            SET finished_at = ?1, status = ?2,
                processed_ingestions = ?3, loaded_rows = ?4, rejected_rows = ?5
            WHERE id = ?6 AND status = ?7
            "#,
            params![
                finished_at,
                summary.status.as_str(),
                summary.processed_ingestions,
                summary.loaded_rows,
                summary.rejected_rows,
                summary.run_id,
                RunStatus::Running.as_str(),
            ],
        )?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "EtlRun(RUNNING)".to_string(),
                id: summary.run_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<EtlRun>> {
        let conn = self.get_conn()?;
        let run = conn
            .query_row(
                r#"
                SELECT id, started_at, finished_at, status,
                       processed_ingestions, loaded_rows, rejected_rows
                FROM etl_runs WHERE id = ?1
                "#,
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(run)
    }
}
