// ==========================================
// 价格账本 ETL - 引擎层
// ==========================================
// 职责: 行级校验、别名解析、汇率换算、导入编排
// 红线: Engine 不拼 SQL，所有拒收必须输出 reason
// ==========================================

pub mod alias_resolver;
pub mod error;
pub mod etl_runner;
pub mod fx_converter;
pub mod row_validator;

pub use alias_resolver::{AliasLookup, AliasResolver};
pub use error::{EtlError, EtlResult, FxError};
pub use etl_runner::EtlRunner;
pub use fx_converter::{CurrencyConverter, FxRateLookup};
pub use row_validator::validate_row;
