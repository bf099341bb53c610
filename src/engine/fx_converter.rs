// ==========================================
// 价格账本 ETL - 汇率换算
// ==========================================
// 口径:
// 1. 币种相同 → 原值返回，不查表
// 2. 观测时间截断到自然日
// 3. 直接汇率 source→target: amount × rate
// 4. 反向汇率 target→source 且非 0: amount ÷ rate
// 5. 否则 NoRate
// 不做插值、不做交叉汇率
// ==========================================

use crate::engine::error::FxError;
use crate::repository::error::RepositoryResult;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// 汇率查询接口（由 FxRateRepository 实现）
pub trait FxRateLookup: Send + Sync {
    fn find_rate(&self, date: NaiveDate, base: &str, quote: &str) -> RepositoryResult<Option<f64>>;
}

pub struct CurrencyConverter {
    lookup: Arc<dyn FxRateLookup>,
}

impl CurrencyConverter {
    pub fn new(lookup: Arc<dyn FxRateLookup>) -> Self {
        Self { lookup }
    }

    pub fn convert(
        &self,
        amount: f64,
        currency: &str,
        observed_at: NaiveDateTime,
        target: &str,
    ) -> Result<f64, FxError> {
        let from = currency.trim().to_uppercase();
        let to = target.trim().to_uppercase();

        if from == to {
            return Ok(amount);
        }

        let date = observed_at.date();

        if let Some(rate) = self.lookup.find_rate(date, &from, &to)? {
            return Ok(amount * rate);
        }

        if let Some(inverse) = self.lookup.find_rate(date, &to, &from)? {
            if inverse != 0.0 {
                return Ok(amount / inverse);
            }
        }

        Err(FxError::NoRate { from, to, date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubRates {
        rates: HashMap<(NaiveDate, String, String), f64>,
        calls: Mutex<usize>,
    }

    impl StubRates {
        fn new(entries: &[(&str, &str, f64)]) -> Self {
            let rates = entries
                .iter()
                .map(|(b, q, r)| ((day(), b.to_string(), q.to_string()), *r))
                .collect();
            Self {
                rates,
                calls: Mutex::new(0),
            }
        }
    }

    impl FxRateLookup for StubRates {
        fn find_rate(&self, date: NaiveDate, base: &str, quote: &str) -> RepositoryResult<Option<f64>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self
                .rates
                .get(&(date, base.to_string(), quote.to_string()))
                .copied())
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 20).unwrap()
    }

    fn noon() -> NaiveDateTime {
        day().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_identity_skips_lookup() {
        let stub = Arc::new(StubRates::new(&[]));
        let converter = CurrencyConverter::new(stub.clone());

        assert_eq!(converter.convert(123.45, "aed", noon(), "AED").unwrap(), 123.45);
        assert_eq!(*stub.calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_direct_rate() {
        let converter = CurrencyConverter::new(Arc::new(StubRates::new(&[("USD", "AED", 3.6725)])));
        let aed = converter.convert(30.0, "USD", noon(), "AED").unwrap();
        assert!((aed - 110.175).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_rate() {
        let converter = CurrencyConverter::new(Arc::new(StubRates::new(&[("AED", "EUR", 0.25)])));
        let aed = converter.convert(25.0, "EUR", noon(), "AED").unwrap();
        assert!((aed - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_direct_inverse_round_trip() {
        let converter = CurrencyConverter::new(Arc::new(StubRates::new(&[("USD", "AED", 3.6725)])));
        let aed = converter.convert(42.0, "USD", noon(), "AED").unwrap();
        let usd = converter.convert(aed, "AED", noon(), "USD").unwrap();
        assert!((usd - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_inverse_rate_is_no_rate() {
        let converter = CurrencyConverter::new(Arc::new(StubRates::new(&[("AED", "GBP", 0.0)])));
        let err = converter.convert(10.0, "GBP", noon(), "AED").unwrap_err();
        assert!(matches!(err, FxError::NoRate { .. }));
    }

    #[test]
    fn test_missing_rate_names_pair_and_date() {
        let converter = CurrencyConverter::new(Arc::new(StubRates::new(&[("USD", "AED", 3.6725)])));
        let other_day = NaiveDate::from_ymd_opt(2025, 12, 21)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let err = converter.convert(10.0, "usd", other_day, "AED").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("USD"));
        assert!(msg.contains("AED"));
        assert!(msg.contains("2025-12-21"));
    }
}
