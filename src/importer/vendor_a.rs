// ==========================================
// 价格账本 ETL - 供应商 A 解析器 (CSV)
// ==========================================
// 列: sku,name,price,currency,date
// ==========================================

use crate::domain::types::VendorFormat;
use crate::importer::csv_feed::{CsvColumns, CsvPriceStream};
use crate::importer::error::ImportResult;
use crate::importer::vendor_parser_trait::{RowStream, VendorParser};
use std::path::Path;

const COLUMNS: CsvColumns = CsvColumns {
    sku: "sku",
    name: "name",
    price: "price",
    currency: "currency",
    observed_at: "date",
};

pub struct VendorAParser;

impl VendorParser for VendorAParser {
    fn format(&self) -> VendorFormat {
        VendorFormat::VendorA
    }

    fn open(&self, file_path: &Path, vendor_id: &str) -> ImportResult<RowStream> {
        let stream = CsvPriceStream::open(file_path, vendor_id, COLUMNS)?;
        Ok(Box::new(stream))
    }
}
