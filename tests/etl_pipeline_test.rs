// ==========================================
// 导入编排集成测试
// ==========================================
// 测试目标: 解析 → 校验 → 别名 → 汇率 → 价格/拒收 → 文件/运行状态
// ==========================================


use price_ledger_etl::domain::types::{IngestionStatus, RunStatus};
use price_ledger_etl::logging;
use price_ledger_etl::repository::{
    IngestionRepository, PriceRepository, RejectionRepository,
};
use price_ledger_etl::EtlRunner;
use test_helpers::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ==========================================
// 端到端: 三家供应商
// ==========================================

#[test]
fn test_three_vendor_end_to_end() {
    logging::init_test();
    let env = create_test_env().unwrap();
    let api = env.api();

    api.ingest_upload("vendor_a", "a.csv", VENDOR_A_RTX_CSV.as_bytes()).unwrap();
    api.ingest_upload("vendor_b", "b.json", VENDOR_B_RTX_JSON.as_bytes()).unwrap();
    api.ingest_upload("vendor_c", "c.csv", VENDOR_C_RTX_CSV.as_bytes()).unwrap();

    let summary = api.run_etl().unwrap();
    assert_eq!(summary.status, RunStatus::Done);
    assert_eq!(summary.processed_ingestions, 3);
    assert_eq!(summary.loaded_rows, 3);
    assert_eq!(summary.rejected_rows, 0);

    let comparison = api.compare("P-RTX4070").unwrap();
    let by_vendor: Vec<(&str, f64)> = comparison
        .vendors
        .iter()
        .map(|q| (q.vendor_id.as_str(), q.price_target))
        .collect();
    assert_eq!(by_vendor.len(), 3);
    assert_eq!(by_vendor[0].0, "V-A");
    assert!(approx(by_vendor[0].1, 100.00));
    assert_eq!(by_vendor[1].0, "V-C");
    assert!(approx(by_vendor[1].1, 100.50));
    assert_eq!(by_vendor[2].0, "V-B");
    assert!(approx(by_vendor[2].1, 110.175));

    let cheapest = api.cheapest().unwrap();
    assert_eq!(cheapest.len(), 1);
    assert_eq!(cheapest[0].product_id, "P-RTX4070");
    assert_eq!(cheapest[0].vendors.len(), 1);
    assert_eq!(cheapest[0].vendors[0].vendor_id, "V-A");
    assert!(approx(cheapest[0].cheapest_target, 100.0));

    for ingestion in api.list_ingestions(None).unwrap() {
        assert_eq!(ingestion.status, IngestionStatus::Processed);
        assert_eq!(ingestion.message.as_deref(), Some("ok"));
    }

    let run = api.get_run(summary.run_id).unwrap();
    assert_eq!(run.status, RunStatus::Done);
    assert!(run.finished_at.is_some());
    assert_eq!(run.loaded_rows, 3);
}

// ==========================================
// 行级拒收: 固定判定顺序
// ==========================================

#[test]
fn test_row_rejections_follow_check_order() {
    logging::init_test();
    let env = create_test_env().unwrap();
    let api = env.api();

    // 行 2..7: 空 SKU / 价格为 0（SKU 亦未知）/ 缺币种 / 未知别名 / 无汇率 / 合法
    let body = "\
sku,name,price,currency,date
,No SKU,10,AED,2025-12-20
NOT-A-SKU,Zero,0,AED,2025-12-20
GT-R7-7800X3D,No currency,1500,,2025-12-20
GT-UNKNOWN,Unknown,99,AED,2025-12-20
GT-MSI-B650-ATX,Pounds,50,GBP,2025-12-20
GT-PSU-750-GOLD,PSU,350, aed ,2025-12-20
";
    let upload = api.ingest_upload("vendor_a", "mixed.csv", body.as_bytes()).unwrap();

    let summary = api.run_etl().unwrap();
    assert_eq!(summary.status, RunStatus::Done);
    assert_eq!(summary.loaded_rows, 1);
    assert_eq!(summary.rejected_rows, 5);

    let ingestion = api.get_ingestion(upload.ingestion_id).unwrap();
    assert_eq!(ingestion.status, IngestionStatus::Processed);

    let rejections = RejectionRepository::new(env.conn.clone())
        .list_by_ingestion(upload.ingestion_id)
        .unwrap();
    let reasons: Vec<(i64, &str)> = rejections
        .iter()
        .map(|r| (r.row_number, r.reason.as_str()))
        .collect();

    assert_eq!(reasons[0], (2, "missing_vendor_sku"));
    assert_eq!(reasons[1], (3, "non_positive_price"));
    assert_eq!(reasons[2], (4, "missing_currency"));
    assert_eq!(reasons[3], (5, "unknown_product_alias"));
    assert_eq!(reasons[4].0, 6);
    assert!(reasons[4].1.starts_with("fx_error:"));
    assert!(reasons[4].1.contains("GBP"));
    assert!(reasons[4].1.contains("AED"));
    assert!(reasons[4].1.contains("2025-12-20"));

    // raw_row 保存规范化后的整行
    assert_eq!(rejections[4].raw_row["vendor_sku"], "GT-MSI-B650-ATX");
    assert_eq!(rejections[4].raw_row["currency"], "GBP");
    assert_eq!(rejections[0].raw_row["vendor_sku"], "");

    let prices = PriceRepository::new(env.conn.clone())
        .list_by_ingestion(upload.ingestion_id)
        .unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].product_id, "P-PSU750");
    assert_eq!(prices[0].currency, "AED");
    assert!(approx(prices[0].price_aed, 350.0));
}

#[test]
fn test_file_without_valid_rows_is_still_processed() {
    let env = create_test_env().unwrap();
    let api = env.api();

    let body = "sku,name,price,currency,date\nGT-NVME-1TB-G4,SSD,-1,AED,2025-12-20\n";
    let upload = api.ingest_upload("vendor_a", "neg.csv", body.as_bytes()).unwrap();

    let summary = api.run_etl().unwrap();
    assert_eq!(summary.status, RunStatus::Done);
    assert_eq!(summary.loaded_rows, 0);
    assert_eq!(summary.rejected_rows, 1);
    assert_eq!(
        api.get_ingestion(upload.ingestion_id).unwrap().status,
        IngestionStatus::Processed
    );
}

// ==========================================
// 文件级失败
// ==========================================

#[test]
fn test_structural_error_keeps_rows_written_before_it() {
    logging::init_test();
    let env = create_test_env().unwrap();
    let api = env.api();

    let body = "\
vendor_code,desc,unit_price,ccy,as_of
EC-RTX4070,GPU,25,EUR,2025-12-20
EC-NOPE,Unknown,10,EUR,2025-12-20
EC-B650-MSI,Board,not-a-number,EUR,2025-12-20
EC-PSU-750-GOLD,PSU,80,EUR,2025-12-20
";
    let upload = api.ingest_upload("vendor_c", "broken.csv", body.as_bytes()).unwrap();

    let summary = api.run_etl().unwrap();
    assert_eq!(summary.status, RunStatus::Partial);
    assert_eq!(summary.processed_ingestions, 1);
    assert_eq!(summary.loaded_rows, 1);
    assert_eq!(summary.rejected_rows, 1);

    let ingestion = api.get_ingestion(upload.ingestion_id).unwrap();
    assert_eq!(ingestion.status, IngestionStatus::Failed);
    let message = ingestion.message.unwrap_or_default();
    assert!(message.contains("unit_price"), "message = {}", message);

    assert_eq!(count_rows(&env.conn, "prices"), 1);
    assert_eq!(count_rows(&env.conn, "rejections"), 1);
}

#[test]
fn test_unknown_vendor_fails_without_records() {
    let env = create_test_env().unwrap();
    let path = env.write_file("z.csv", VENDOR_A_RTX_CSV);

    let ingestion_repo = IngestionRepository::new(env.conn.clone());
    let id = ingestion_repo
        .insert_pending("V-Z", "z.csv", &path.to_string_lossy())
        .unwrap();

    let runner = EtlRunner::new(env.conn.clone(), "AED");
    let summary = runner.run_all_pending().unwrap();

    assert_eq!(summary.status, RunStatus::Partial);
    assert_eq!(summary.processed_ingestions, 1);
    assert_eq!(summary.loaded_rows, 0);
    assert_eq!(summary.rejected_rows, 0);

    let ingestion = ingestion_repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(ingestion.status, IngestionStatus::Failed);
    assert_eq!(ingestion.message.as_deref(), Some("Unknown vendor_id: V-Z"));
    assert_eq!(count_rows(&env.conn, "prices"), 0);
    assert_eq!(count_rows(&env.conn, "rejections"), 0);
}

#[test]
fn test_missing_file_fails_and_run_continues() {
    let env = create_test_env().unwrap();
    let api = env.api();

    let ingestion_repo = IngestionRepository::new(env.conn.clone());
    let missing_id = ingestion_repo
        .insert_pending("V-A", "gone.csv", &env.storage.path().join("gone.csv").to_string_lossy())
        .unwrap();
    let ok = api.ingest_upload("vendor_a", "a.csv", VENDOR_A_RTX_CSV.as_bytes()).unwrap();

    let summary = api.run_etl().unwrap();
    assert_eq!(summary.status, RunStatus::Partial);
    assert_eq!(summary.processed_ingestions, 2);
    assert_eq!(summary.loaded_rows, 1);

    assert_eq!(
        api.get_ingestion(missing_id).unwrap().status,
        IngestionStatus::Failed
    );
    assert_eq!(
        api.get_ingestion(ok.ingestion_id).unwrap().status,
        IngestionStatus::Processed
    );
}

#[test]
fn test_vendor_b_without_as_of_fails() {
    let env = create_test_env().unwrap();
    let api = env.api();

    let body = r#"{"items": [{"partNumber": "PN-4070-12G", "pricing": {"amount": 30, "ccy": "USD"}}]}"#;
    let upload = api.ingest_upload("vendor_b", "b.json", body.as_bytes()).unwrap();

    let summary = api.run_etl().unwrap();
    assert_eq!(summary.status, RunStatus::Partial);

    let ingestion = api.get_ingestion(upload.ingestion_id).unwrap();
    assert_eq!(ingestion.status, IngestionStatus::Failed);
    assert!(ingestion.message.unwrap_or_default().contains("asOf"));
    assert_eq!(count_rows(&env.conn, "prices"), 0);
}

// ==========================================
// 运行边界
// ==========================================

#[test]
fn test_finished_ingestions_are_not_reprocessed() {
    let env = create_test_env().unwrap();
    let api = env.api();

    api.ingest_upload("vendor_a", "a.csv", VENDOR_A_RTX_CSV.as_bytes()).unwrap();
    let first = api.run_etl().unwrap();
    assert_eq!(first.loaded_rows, 1);

    let second = api.run_etl().unwrap();
    assert_ne!(second.run_id, first.run_id);
    assert_eq!(second.status, RunStatus::Done);
    assert_eq!(second.processed_ingestions, 0);
    assert_eq!(second.loaded_rows, 0);
    assert_eq!(count_rows(&env.conn, "prices"), 1);
    assert_eq!(count_rows(&env.conn, "etl_runs"), 2);
}

#[test]
fn test_pending_ingestions_processed_in_id_order() {
    let env = create_test_env().unwrap();
    let api = env.api();

    let first = api.ingest_upload("vendor_c", "c.csv", VENDOR_C_RTX_CSV.as_bytes()).unwrap();
    let second = api.ingest_upload("vendor_a", "a.csv", VENDOR_A_RTX_CSV.as_bytes()).unwrap();
    api.run_etl().unwrap();

    let price_repo = PriceRepository::new(env.conn.clone());
    let p1 = price_repo.list_by_ingestion(first.ingestion_id).unwrap();
    let p2 = price_repo.list_by_ingestion(second.ingestion_id).unwrap();
    assert!(p1[0].id < p2[0].id);
}

#[test]
fn test_target_currency_is_configurable() {
    let env = create_test_env().unwrap();
    let path = env.write_file("a.csv", VENDOR_A_RTX_CSV);
    let id = IngestionRepository::new(env.conn.clone())
        .insert_pending("V-A", "a.csv", &path.to_string_lossy())
        .unwrap();

    // AED → USD 走直接汇率 0.2723
    let runner = EtlRunner::new(env.conn.clone(), "usd");
    assert_eq!(runner.target_currency(), "USD");
    let summary = runner.run_all_pending().unwrap();
    assert_eq!(summary.loaded_rows, 1);

    let prices = PriceRepository::new(env.conn.clone()).list_by_ingestion(id).unwrap();
    assert!(approx(prices[0].price_aed, 100.0 * 0.2723));
    assert_eq!(prices[0].currency, "AED");
    assert!(approx(prices[0].price, 100.0));
}
