// ==========================================
// 价格账本 ETL - API 响应结构
// ==========================================
// 价格字段统一为结算币种口径（price_target）
// ==========================================

use crate::domain::types::IngestionStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 上传登记响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestUploadResponse {
    pub ingestion_id: i64,
    pub vendor_id: String,
    pub stored_path: String,
    pub status: IngestionStatus,
}

/// 重新排队响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequeueResponse {
    pub ingestion_id: i64,
    /// 删除的价格记录数
    pub deleted_prices: usize,
    /// 删除的拒收记录数
    pub deleted_rejections: usize,
    pub status: IngestionStatus,
}

/// 单个供应商的报价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorQuote {
    pub vendor_id: String,
    pub price_target: f64,
    pub as_of: NaiveDateTime,
}

/// 产品最低价（并列的供应商全部列出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheapestEntry {
    pub product_id: String,
    pub product: String,
    pub cheapest_target: f64,
    pub vendors: Vec<VendorQuote>,
}

/// 单产品比价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductComparison {
    pub product_id: String,
    pub product: String,
    /// 各供应商最新报价，按价格升序
    pub vendors: Vec<VendorQuote>,
    pub spread_target: Option<f64>,
    /// 最低价 ≤ 0 时为 None
    pub spread_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub vendor_id: String,
    pub t: NaiveDateTime,
    pub price_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub product_id: String,
    pub product: String,
    pub points: Vec<HistoryPoint>,
}
