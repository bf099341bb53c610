// ==========================================
// 价格账本 ETL - 参考数据实体
// ==========================================
// 对齐: vendors / products / product_aliases / fx_rates 表
// 红线: 由外部种子流程维护，核心流程只读
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String, // 如 V-A
    pub name: String,
    pub default_currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String, // 如 P-RTX4070
    pub canonical_name: String,
    pub category: String,
}

// (vendor_id, vendor_sku) 唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAlias {
    pub vendor_id: String,
    pub vendor_sku: String,
    pub product_id: String,
    pub vendor_name_raw: Option<String>,
}

// 1 单位 base_currency 折合 rate 单位 quote_currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    pub fx_date: NaiveDate,
    pub base_currency: String,
    pub quote_currency: String,
    pub rate: f64,
}
