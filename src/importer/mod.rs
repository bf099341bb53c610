// ==========================================
// 价格账本 ETL - 导入层
// ==========================================
// 职责: 供应商文件 → 规范化价格行（惰性）
// 支持: 供应商 A (CSV) / 供应商 B (JSON) / 供应商 C (CSV)
// ==========================================

pub mod csv_feed;
pub mod error;
pub mod field_cleaner;
pub mod upload_store;
pub mod vendor_a;
pub mod vendor_b;
pub mod vendor_c;
pub mod vendor_parser_trait;

use crate::domain::types::VendorFormat;

pub use error::{ImportError, ImportResult};
pub use upload_store::save_upload_bytes;
pub use vendor_a::VendorAParser;
pub use vendor_b::VendorBParser;
pub use vendor_c::VendorCParser;
pub use vendor_parser_trait::{RowStream, VendorParser};

/// 按供应商格式选择解析器
pub fn parser_for(format: VendorFormat) -> Box<dyn VendorParser> {
    match format {
        VendorFormat::VendorA => Box::new(VendorAParser),
        VendorFormat::VendorB => Box::new(VendorBParser),
        VendorFormat::VendorC => Box::new(VendorCParser),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_for_matches_format() {
        for format in VendorFormat::ALL {
            assert_eq!(parser_for(format).format(), format);
        }
    }
}
