// ==========================================
// 价格账本 ETL - 字段清洗与类型转换
// ==========================================
// 职责: TRIM / UPPER / NULL 标准化 / 价格与时间解析
// 口径: 缺失字段一律转为空串或 0，由校验阶段统一判定；
//       有值但无法解析则视为结构错误
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// 去首尾空白
pub fn clean_text(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// 币种: TRIM + UPPER
pub fn clean_currency(value: Option<&str>) -> String {
    clean_text(value).to_uppercase()
}

/// 空串/空白 → None
pub fn normalize_null(value: Option<&str>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 解析价格（缺失/空白 → 0.0）
pub fn parse_price(value: Option<&str>, row: usize, field: &str) -> ImportResult<f64> {
    let raw = match normalize_null(value) {
        Some(v) => v,
        None => return Ok(0.0),
    };

    let parsed: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| {
        ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("'{}' 不是数字: {}", raw, e),
        }
    })?;

    if !parsed.is_finite() {
        return Err(ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("'{}' 不是有限数值", raw),
        });
    }

    Ok(parsed)
}

/// 解析 ISO 8601 时间戳
///
/// 支持:
/// - RFC 3339（带时区，保留当地时钟时间）
/// - YYYY-MM-DDTHH:MM[:SS[.f]] / YYYY-MM-DD HH:MM[:SS[.f]]
/// - YYYY-MM-DD（零点）
pub fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.naive_local());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// 解析观测时间（缺失或格式错误均为结构错误）
pub fn parse_observed_at(value: Option<&str>, row: usize, field: &str) -> ImportResult<NaiveDateTime> {
    let raw = clean_text(value);
    parse_iso_datetime(&raw).ok_or_else(|| ImportError::DateFormatError {
        row,
        field: field.to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_coerces_missing_to_zero() {
        assert_eq!(parse_price(None, 2, "price").unwrap(), 0.0);
        assert_eq!(parse_price(Some("   "), 2, "price").unwrap(), 0.0);
        assert_eq!(parse_price(Some(" 12.50 "), 2, "price").unwrap(), 12.5);
        assert_eq!(parse_price(Some("-3"), 2, "price").unwrap(), -3.0);
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        let err = parse_price(Some("abc"), 7, "price").unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 7, .. }));

        assert!(parse_price(Some("NaN"), 7, "price").is_err());
        assert!(parse_price(Some("inf"), 7, "price").is_err());
    }

    #[test]
    fn test_parse_iso_datetime_variants() {
        let midnight = NaiveDate::from_ymd_opt(2025, 12, 20)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(parse_iso_datetime("2025-12-20"), Some(midnight));

        let ts = NaiveDate::from_ymd_opt(2025, 12, 20)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(parse_iso_datetime("2025-12-20T09:15:00"), Some(ts));
        assert_eq!(parse_iso_datetime("2025-12-20 09:15:00"), Some(ts));
        assert_eq!(parse_iso_datetime("2025-12-20T09:15"), Some(ts));
        // 带时区: 保留当地时钟时间
        assert_eq!(parse_iso_datetime("2025-12-20T09:15:00+04:00"), Some(ts));

        assert_eq!(parse_iso_datetime(""), None);
        assert_eq!(parse_iso_datetime("20/12/2025"), None);
    }

    #[test]
    fn test_clean_currency_uppercases() {
        assert_eq!(clean_currency(Some(" usd ")), "USD");
        assert_eq!(clean_currency(None), "");
    }
}
