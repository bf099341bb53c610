// ==========================================
// 价格账本 ETL - 供应商 B 解析器 (JSON)
// ==========================================
// 结构: { "asOf": "...", "items": [ { "partNumber", "title",
//         "pricing": { "amount", "ccy" } } ] }
// 口径: asOf 作用于所有条目；行号 = 条目序号（从 1 开始）
// ==========================================

use crate::domain::price_row::CanonicalPriceRow;
use crate::domain::types::VendorFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_cleaner::{clean_currency, clean_text, normalize_null, parse_iso_datetime, parse_price};
use crate::importer::vendor_parser_trait::{RowStream, VendorParser};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct VendorBDocument {
    #[serde(rename = "asOf")]
    as_of: Option<Value>,
    #[serde(default)]
    items: Option<Vec<Value>>,
}

pub struct VendorBParser;

impl VendorParser for VendorBParser {
    fn format(&self) -> VendorFormat {
        VendorFormat::VendorB
    }

    fn open(&self, file_path: &Path, vendor_id: &str) -> ImportResult<RowStream> {
        let file = File::open(file_path)?;
        let doc: VendorBDocument = serde_json::from_reader(BufReader::new(file))?;

        let as_of = parse_as_of(doc.as_of.as_ref())?;
        let vendor_id = vendor_id.to_string();
        let items = doc.items.unwrap_or_default();

        let mut failed = false;
        let stream = items
            .into_iter()
            .enumerate()
            .map_while(move |(idx, item)| {
                if failed {
                    return None;
                }
                let row = idx + 1;
                let result = map_item(&item, row, &vendor_id, as_of).map(|r| (row, r));
                failed = result.is_err();
                Some(result)
            });

        Ok(Box::new(stream))
    }
}

fn parse_as_of(value: Option<&Value>) -> ImportResult<NaiveDateTime> {
    let raw = match value {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Null) | None => return Err(ImportError::MissingField("asOf".to_string())),
        Some(other) => {
            return Err(ImportError::DateFormatError {
                row: 0,
                field: "asOf".to_string(),
                value: other.to_string(),
            })
        }
    };

    parse_iso_datetime(raw).ok_or_else(|| ImportError::DateFormatError {
        row: 0,
        field: "asOf".to_string(),
        value: raw.to_string(),
    })
}

/// JSON 标量转文本（字符串去空白，数字转字符串，其他视为缺失）
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

fn map_item(
    item: &Value,
    row: usize,
    vendor_id: &str,
    as_of: NaiveDateTime,
) -> ImportResult<CanonicalPriceRow> {
    let obj = item.as_object().ok_or_else(|| ImportError::MalformedRecord {
        row,
        message: format!("条目不是 JSON 对象: {}", item),
    })?;

    let pricing = obj.get("pricing").and_then(Value::as_object);
    let amount = pricing.and_then(|p| scalar_text(p.get("amount")));
    let ccy = pricing.and_then(|p| scalar_text(p.get("ccy")));
    let sku = scalar_text(obj.get("partNumber"));
    let title = scalar_text(obj.get("title"));

    Ok(CanonicalPriceRow {
        vendor_id: vendor_id.to_string(),
        vendor_sku: clean_text(sku.as_deref()),
        vendor_name_raw: normalize_null(title.as_deref()),
        price: parse_price(amount.as_deref(), row, "pricing.amount")?,
        currency: clean_currency(ccy.as_deref()),
        observed_at: as_of,
    })
}
