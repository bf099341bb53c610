// ==========================================
// 价格账本 ETL - API 层
// ==========================================
// 职责: 对外业务接口（上传、运行、查询）
// ==========================================

pub mod dto;
pub mod error;
pub mod etl_api;

pub use dto::{
    CheapestEntry, HistoryPoint, IngestUploadResponse, PriceHistory, ProductComparison,
    RequeueResponse, VendorQuote,
};
pub use error::{ApiError, ApiResult};
pub use etl_api::{EtlApi, DEFAULT_INGESTION_LIMIT, DEFAULT_REJECTION_LIMIT};
