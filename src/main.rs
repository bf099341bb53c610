// ==========================================
// 价格账本 ETL - 命令行入口
// ==========================================
// 用法:
//   price-etl                         处理全部待导入文件
//   price-etl run                     同上
//   price-etl ingest <vendor_key> <file>  登记一个上传文件
//   price-etl requeue <ingestion_id>  重新排队
// 配置: PRICE_ETL_DB_PATH / PRICE_ETL_STORAGE_DIR / PRICE_ETL_TARGET_CURRENCY
// ==========================================

use anyhow::{bail, Context, Result};
use price_ledger_etl::{logging, EtlApi, EtlConfig};
use std::path::Path;

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", price_ledger_etl::APP_NAME, price_ledger_etl::VERSION);
    tracing::info!("==================================================");

    let config = EtlConfig::from_env();
    tracing::info!(
        "使用数据库: {}，存储目录: {}，结算币种: {}",
        config.db_path,
        config.storage_dir.display(),
        config.target_currency
    );

    let api = EtlApi::open(config).context("初始化数据库失败")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("run");

    match command {
        "run" => {
            let summary = api.run_etl().context("ETL 运行失败")?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "ingest" => {
            let (vendor_key, file) = match (args.get(1), args.get(2)) {
                (Some(v), Some(f)) => (v, f),
                _ => bail!("用法: price-etl ingest <vendor_key> <file>"),
            };
            let path = Path::new(file);
            let data = std::fs::read(path).with_context(|| format!("读取文件失败: {}", file))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let response = api.ingest_upload(vendor_key, &file_name, &data)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "requeue" => {
            let id: i64 = match args.get(1) {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("无效的 ingestion_id: {}", raw))?,
                None => bail!("用法: price-etl requeue <ingestion_id>"),
            };
            let response = api.requeue_ingestion(id)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        other => bail!("未知命令: {}（可选: run, ingest, requeue）", other),
    }

    Ok(())
}
