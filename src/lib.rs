// ==========================================
// 价格账本 ETL - 核心库
// ==========================================
// 职责: 多供应商价格文件 → 规范化 → 别名解析 → 汇率换算 → 价格账本
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 校验 / 解析 / 换算 / 编排
pub mod engine;

// 导入层 - 供应商文件解析
pub mod importer;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 参考数据种子
pub mod seed;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IngestionStatus, RejectReason, RunStatus, VendorFormat};

// 领域实体
pub use domain::{CanonicalPriceRow, EtlRun, Price, RawIngestion, Rejection, RunSummary};

// 引擎
pub use engine::{AliasResolver, CurrencyConverter, EtlRunner};

// API
pub use api::{ApiError, EtlApi};

// 配置
pub use config::EtlConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "价格账本 ETL";
