// ==========================================
// 价格账本 ETL - 规范化价格行
// ==========================================
// 用途: 各供应商解析器的统一输出（解析之后、校验之前）
// 生命周期: 仅在单次导入流程内；拒收时整行序列化落库
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// CanonicalPriceRow
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPriceRow {
    pub vendor_id: String,
    pub vendor_sku: String,              // 可能为空（校验阶段拒收）
    pub vendor_name_raw: Option<String>, // 供应商原始品名
    pub observed_at: NaiveDateTime,      // 观测时间
    pub currency: String,                // 已 TRIM + UPPER，可能为空
    pub price: f64,                      // 可能 <= 0（校验阶段拒收）
}

impl CanonicalPriceRow {
    /// 序列化为拒收记录的 raw_row
    pub fn to_raw_json(&self) -> serde_json::Value {
        // 字段均为可序列化基础类型，不会失败
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// 带源文件位置的行（1-based）
pub type NumberedRow = (usize, CanonicalPriceRow);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_raw_json_keeps_all_fields() {
        let row = CanonicalPriceRow {
            vendor_id: "V-A".to_string(),
            vendor_sku: "GT-RTX4070-12G".to_string(),
            vendor_name_raw: None,
            observed_at: NaiveDate::from_ymd_opt(2025, 12, 20)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            currency: "AED".to_string(),
            price: 2499.0,
        };

        let json = row.to_raw_json();
        assert_eq!(json["vendor_id"], "V-A");
        assert_eq!(json["vendor_sku"], "GT-RTX4070-12G");
        assert!(json["vendor_name_raw"].is_null());
        assert_eq!(json["observed_at"], "2025-12-20T10:30:00");
        assert_eq!(json["currency"], "AED");
        assert_eq!(json["price"], 2499.0);

        let back: CanonicalPriceRow = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }
}
