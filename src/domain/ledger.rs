// ==========================================
// 价格账本 ETL - 运行期实体
// ==========================================
// 对齐: raw_ingestions / prices / rejections / etl_runs 表
// 红线: prices / rejections 只追加，核心流程不做更新
// ==========================================

use crate::domain::types::{IngestionStatus, RunStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// RawIngestion - 上传文件登记
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIngestion {
    pub id: i64,
    pub vendor_id: String,
    pub file_name: String,
    pub stored_path: String,
    pub ingested_at: NaiveDateTime,
    pub status: IngestionStatus,
    pub message: Option<String>,
}

// ==========================================
// NewPrice / Price - 价格账本记录
// ==========================================
// price_aed: 换算到结算币种后的价格（列名沿用账本口径）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrice {
    pub product_id: String,
    pub vendor_id: String,
    pub observed_at: NaiveDateTime,
    pub currency: String,
    pub price: f64,
    pub price_aed: f64,
    pub source_ingestion_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub id: i64,
    pub product_id: String,
    pub vendor_id: String,
    pub observed_at: NaiveDateTime,
    pub currency: String,
    pub price: f64,
    pub price_aed: f64,
    pub source_ingestion_id: i64,
}

// ==========================================
// Rejection - 拒收行审计记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub id: i64,
    pub ingestion_id: i64,
    pub row_number: i64,
    pub reason: String,
    pub raw_row: serde_json::Value,
    pub created_at: NaiveDateTime,
}

// ==========================================
// EtlRun - 一次完整的编排执行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtlRun {
    pub id: i64,
    pub started_at: NaiveDateTime,
    pub finished_at: Option<NaiveDateTime>,
    pub status: RunStatus,
    pub processed_ingestions: i64,
    pub loaded_rows: i64,
    pub rejected_rows: i64,
}

// ==========================================
// RunSummary - 触发方唯一可见的返回值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: i64,
    pub status: RunStatus,
    pub processed_ingestions: i64,
    pub loaded_rows: i64,
    pub rejected_rows: i64,
}
