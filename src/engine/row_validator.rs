// ==========================================
// 价格账本 ETL - 行级基础校验
// ==========================================
// 顺序: SKU 为空 → 价格非正 → 币种为空
// 命中第一条即返回，别名与汇率在其后由编排器判定
// ==========================================

use crate::domain::price_row::CanonicalPriceRow;
use crate::domain::types::RejectReason;

pub fn validate_row(row: &CanonicalPriceRow) -> Result<(), RejectReason> {
    if row.vendor_sku.is_empty() {
        return Err(RejectReason::MissingVendorSku);
    }
    if row.price <= 0.0 {
        return Err(RejectReason::NonPositivePrice);
    }
    if row.currency.is_empty() {
        return Err(RejectReason::MissingCurrency);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(sku: &str, price: f64, currency: &str) -> CanonicalPriceRow {
        CanonicalPriceRow {
            vendor_id: "V-A".to_string(),
            vendor_sku: sku.to_string(),
            vendor_name_raw: None,
            observed_at: NaiveDate::from_ymd_opt(2025, 12, 20)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            currency: currency.to_string(),
            price,
        }
    }

    #[test]
    fn test_valid_row_passes() {
        assert_eq!(validate_row(&row("GT-1", 1.0, "AED")), Ok(()));
    }

    #[test]
    fn test_checks_apply_in_order() {
        assert_eq!(validate_row(&row("", 0.0, "")), Err(RejectReason::MissingVendorSku));
        assert_eq!(validate_row(&row("GT-1", 0.0, "")), Err(RejectReason::NonPositivePrice));
        assert_eq!(validate_row(&row("GT-1", -5.0, "AED")), Err(RejectReason::NonPositivePrice));
        assert_eq!(validate_row(&row("GT-1", 5.0, "")), Err(RejectReason::MissingCurrency));
    }
}
