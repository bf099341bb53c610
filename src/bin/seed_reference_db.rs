// ==========================================
// 价格账本 ETL - 参考数据初始化工具
// ==========================================
// 用法: seed_reference_db [db_path]
// 未指定路径时使用 PRICE_ETL_DB_PATH 或默认路径
// ==========================================

use anyhow::{Context, Result};
use price_ledger_etl::config::EtlConfig;
use price_ledger_etl::db::{init_schema, open_sqlite_connection, read_schema_version};
use price_ledger_etl::seed::seed_reference_data;
use std::sync::{Arc, Mutex};

fn main() -> Result<()> {
    price_ledger_etl::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| EtlConfig::from_env().db_path);

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("创建数据库目录失败: {}", parent.display()))?;
        }
    }

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("打开数据库失败: {}", db_path))?;
    init_schema(&conn).context("建表失败")?;
    let version = read_schema_version(&conn)?;

    let report = seed_reference_data(Arc::new(Mutex::new(conn)))
        .map_err(|e| anyhow::anyhow!("写入参考数据失败: {}", e))?;

    println!("数据库: {}", db_path);
    println!("schema_version: {}", version.unwrap_or_default());
    println!(
        "新增 供应商={} 产品={} 别名={} 汇率={}",
        report.vendors, report.products, report.aliases, report.fx_rates
    );

    Ok(())
}
