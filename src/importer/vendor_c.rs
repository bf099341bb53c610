// ==========================================
// 价格账本 ETL - 供应商 C 解析器 (CSV)
// ==========================================
// 列: vendor_code,desc,unit_price,ccy,as_of
// ==========================================

use crate::domain::types::VendorFormat;
use crate::importer::csv_feed::{CsvColumns, CsvPriceStream};
use crate::importer::error::ImportResult;
use crate::importer::vendor_parser_trait::{RowStream, VendorParser};
use std::path::Path;

const COLUMNS: CsvColumns = CsvColumns {
    sku: "vendor_code",
    name: "desc",
    price: "unit_price",
    currency: "ccy",
    observed_at: "as_of",
};

pub struct VendorCParser;

impl VendorParser for VendorCParser {
    fn format(&self) -> VendorFormat {
        VendorFormat::VendorC
    }

    fn open(&self, file_path: &Path, vendor_id: &str) -> ImportResult<RowStream> {
        let stream = CsvPriceStream::open(file_path, vendor_id, COLUMNS)?;
        Ok(Box::new(stream))
    }
}
