// ==========================================
// 价格账本 ETL - 配置层
// ==========================================
// 职责: 数据库路径、存储目录、结算币种
// ==========================================

pub mod etl_config;

pub use etl_config::{default_db_path, EtlConfig, DEFAULT_TARGET_CURRENCY};
