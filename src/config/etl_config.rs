// ==========================================
// 价格账本 ETL - 运行配置
// ==========================================
// 职责: 显式配置对象，按需传给各组件（无全局单例）
// 来源: 环境变量 > 默认值
// ==========================================

use std::path::PathBuf;

/// 环境变量: 数据库路径
pub const ENV_DB_PATH: &str = "PRICE_ETL_DB_PATH";
/// 环境变量: 上传文件存储目录
pub const ENV_STORAGE_DIR: &str = "PRICE_ETL_STORAGE_DIR";
/// 环境变量: 结算币种
pub const ENV_TARGET_CURRENCY: &str = "PRICE_ETL_TARGET_CURRENCY";

/// 默认结算币种
pub const DEFAULT_TARGET_CURRENCY: &str = "AED";
/// 默认存储目录
pub const DEFAULT_STORAGE_DIR: &str = "./storage";

// ==========================================
// EtlConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,
    /// 上传文件落盘目录
    pub storage_dir: PathBuf,
    /// 结算币种（统一换算目标，已转大写）
    pub target_currency: String,
}

impl EtlConfig {
    pub fn new(
        db_path: impl Into<String>,
        storage_dir: impl Into<PathBuf>,
        target_currency: &str,
    ) -> Self {
        Self {
            db_path: db_path.into(),
            storage_dir: storage_dir.into(),
            target_currency: normalize_currency(target_currency),
        }
    }

    /// 从环境变量加载配置，缺失或空白时使用默认值
    pub fn from_env() -> Self {
        let db_path = read_env(ENV_DB_PATH).unwrap_or_else(default_db_path);
        let storage_dir = read_env(ENV_STORAGE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        let target_currency =
            read_env(ENV_TARGET_CURRENCY).unwrap_or_else(|| DEFAULT_TARGET_CURRENCY.to_string());

        Self::new(db_path, storage_dir, &target_currency)
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_currency(raw: &str) -> String {
    let c = raw.trim().to_uppercase();
    if c.is_empty() {
        DEFAULT_TARGET_CURRENCY.to_string()
    } else {
        c
    }
}

/// 默认数据库路径
///
/// 优先使用用户数据目录；拿不到时回退到当前目录。
pub fn default_db_path() -> String {
    let mut path = PathBuf::from("./price_etl.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("price-ledger-etl");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("price_etl.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_currency_is_uppercased() {
        let cfg = EtlConfig::new("x.db", "./s", " usd ");
        assert_eq!(cfg.target_currency, "USD");
    }

    #[test]
    fn test_blank_target_currency_falls_back_to_default() {
        let cfg = EtlConfig::new("x.db", "./s", "   ");
        assert_eq!(cfg.target_currency, DEFAULT_TARGET_CURRENCY);
    }
}
