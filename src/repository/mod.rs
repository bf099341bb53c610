// ==========================================
// 价格账本 ETL - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod alias_repo;
pub mod error;
pub mod fx_rate_repo;
pub mod ingestion_repo;
pub mod price_query_repo;
pub mod price_repo;
pub mod reference_repo;
pub mod rejection_repo;
pub mod run_repo;

pub use alias_repo::ProductAliasRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use fx_rate_repo::FxRateRepository;
pub use ingestion_repo::IngestionRepository;
pub use price_query_repo::PriceQueryRepository;
pub use price_repo::PriceRepository;
pub use reference_repo::ReferenceRepository;
pub use rejection_repo::RejectionRepository;
pub use run_repo::RunRepository;
