// ==========================================
// 价格账本 ETL - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 供应商格式 (Vendor Format)
// ==========================================
// 封闭枚举: 新增供应商格式必须在此显式扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorFormat {
    VendorA, // CSV: sku,name,price,currency,date
    VendorB, // JSON: asOf + items[]
    VendorC, // CSV: vendor_code,desc,unit_price,ccy,as_of
}

impl VendorFormat {
    pub const ALL: [VendorFormat; 3] = [
        VendorFormat::VendorA,
        VendorFormat::VendorB,
        VendorFormat::VendorC,
    ];

    /// 按供应商 ID（V-A/V-B/V-C）匹配格式
    pub fn from_vendor_id(vendor_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.vendor_id() == vendor_id)
    }

    /// 按上传口径的供应商键（vendor_a/...）匹配格式，忽略大小写与首尾空白
    pub fn from_vendor_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.vendor_key() == key)
    }

    pub fn vendor_id(&self) -> &'static str {
        match self {
            VendorFormat::VendorA => "V-A",
            VendorFormat::VendorB => "V-B",
            VendorFormat::VendorC => "V-C",
        }
    }

    pub fn vendor_key(&self) -> &'static str {
        match self {
            VendorFormat::VendorA => "vendor_a",
            VendorFormat::VendorB => "vendor_b",
            VendorFormat::VendorC => "vendor_c",
        }
    }
}

impl fmt::Display for VendorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vendor_id())
    }
}

// ==========================================
// 导入文件状态 (Ingestion Status)
// ==========================================
// 状态机: PENDING → {PROCESSED, FAILED}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionStatus {
    Pending,
    Processed,
    Failed,
}

impl IngestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionStatus::Pending => "PENDING",
            IngestionStatus::Processed => "PROCESSED",
            IngestionStatus::Failed => "FAILED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "PENDING" => Some(IngestionStatus::Pending),
            "PROCESSED" => Some(IngestionStatus::Processed),
            "FAILED" => Some(IngestionStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for IngestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 运行状态 (Run Status)
// ==========================================
// RUNNING → DONE: 所有文件均 PROCESSED
// RUNNING → PARTIAL: 至少一个文件 FAILED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Done,
    Partial,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "RUNNING",
            RunStatus::Done => "DONE",
            RunStatus::Partial => "PARTIAL",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "RUNNING" => Some(RunStatus::Running),
            "DONE" => Some(RunStatus::Done),
            "PARTIAL" => Some(RunStatus::Partial),
            _ => None,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 拒收原因 (Reject Reason)
// ==========================================
// 行级校验按固定顺序判定，命中第一条即停止
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingVendorSku,
    NonPositivePrice,
    MissingCurrency,
    UnknownProductAlias,
    /// 汇率换算失败，附带可直接落库的明细
    FxError(String),
}

impl RejectReason {
    pub fn code(&self) -> String {
        match self {
            RejectReason::MissingVendorSku => "missing_vendor_sku".to_string(),
            RejectReason::NonPositivePrice => "non_positive_price".to_string(),
            RejectReason::MissingCurrency => "missing_currency".to_string(),
            RejectReason::UnknownProductAlias => "unknown_product_alias".to_string(),
            RejectReason::FxError(detail) => format!("fx_error:{}", detail),
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
