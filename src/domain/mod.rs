// ==========================================
// 价格账本 ETL - 领域层
// ==========================================

pub mod ledger;
pub mod price_row;
pub mod reference;
pub mod types;

pub use ledger::{EtlRun, NewPrice, Price, RawIngestion, Rejection, RunSummary};
pub use price_row::{CanonicalPriceRow, NumberedRow};
pub use reference::{FxRate, Product, ProductAlias, Vendor};
pub use types::{IngestionStatus, RejectReason, RunStatus, VendorFormat};
