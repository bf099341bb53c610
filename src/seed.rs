// ==========================================
// 价格账本 ETL - 参考数据种子
// ==========================================
// 内容: 3 个供应商 / 6 个产品 / 18 条别名 / 2025-12-20 汇率
// 幂等: 已存在的记录保持不变
// ==========================================

use crate::domain::reference::{FxRate, Product, ProductAlias, Vendor};
use crate::repository::{
    FxRateRepository, ProductAliasRepository, ReferenceRepository, RepositoryResult,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

const VENDORS: [(&str, &str, &str); 3] = [
    ("V-A", "GulfTech Parts", "AED"),
    ("V-B", "US Parts Direct", "USD"),
    ("V-C", "EuroComp Store", "EUR"),
];

const PRODUCTS: [(&str, &str, &str); 6] = [
    ("P-RTX4070", "NVIDIA GeForce RTX 4070 12GB", "GPU"),
    ("P-RYZEN7800X3D", "AMD Ryzen 7 7800X3D", "CPU"),
    ("P-B650", "MSI B650 ATX Motherboard", "Motherboard"),
    ("P-32GBDDR5", "32GB (2x16GB) DDR5-6000 RAM Kit", "Memory"),
    ("P-1TB_NVME", "1TB NVMe Gen4 SSD", "Storage"),
    ("P-PSU750", "750W 80+ Gold PSU", "PSU"),
];

// (vendor_id, vendor_sku, product_id, vendor_name_raw)
const ALIASES: [(&str, &str, &str, &str); 18] = [
    // 供应商 A (AED, CSV)
    ("V-A", "GT-RTX4070-12G", "P-RTX4070", "RTX 4070 12GB (GulfTech)"),
    ("V-A", "GT-R7-7800X3D", "P-RYZEN7800X3D", "Ryzen 7 7800X3D"),
    ("V-A", "GT-MSI-B650-ATX", "P-B650", "MSI B650 ATX"),
    ("V-A", "GT-DDR5-32-6000", "P-32GBDDR5", "DDR5 32GB 6000"),
    ("V-A", "GT-NVME-1TB-G4", "P-1TB_NVME", "NVMe 1TB Gen4"),
    ("V-A", "GT-PSU-750-GOLD", "P-PSU750", "PSU 750W Gold"),
    // 供应商 B (USD, JSON)
    ("V-B", "PN-4070-12G", "P-RTX4070", "NVIDIA RTX 4070 12GB"),
    ("V-B", "PN-7800X3D", "P-RYZEN7800X3D", "AMD Ryzen 7 7800X3D"),
    ("V-B", "PN-MB-B650", "P-B650", "MSI B650 ATX Motherboard"),
    ("V-B", "PN-RAM-32-D5-6000", "P-32GBDDR5", "32GB DDR5 6000 Kit"),
    ("V-B", "PN-SSD-1TB-NVME4", "P-1TB_NVME", "1TB NVMe Gen4 SSD"),
    ("V-B", "PN-PSU-750-G", "P-PSU750", "750W 80+ Gold PSU"),
    // 供应商 C (EUR, CSV)
    ("V-C", "EC-RTX4070", "P-RTX4070", "GeForce RTX 4070 12GB"),
    ("V-C", "EC-R7-7800X3D", "P-RYZEN7800X3D", "Ryzen 7 7800X3D"),
    ("V-C", "EC-B650-MSI", "P-B650", "MSI B650 ATX"),
    ("V-C", "EC-DDR5-32-6000", "P-32GBDDR5", "DDR5 32GB 6000"),
    ("V-C", "EC-NVME-1TB-G4", "P-1TB_NVME", "NVMe 1TB Gen4"),
    ("V-C", "EC-PSU-750-GOLD", "P-PSU750", "PSU 750W Gold"),
];

// 1 base = rate quote
const FX_RATES: [(&str, &str, f64); 4] = [
    ("USD", "AED", 3.6725),
    ("EUR", "AED", 4.0200),
    ("AED", "USD", 0.2723),
    ("AED", "EUR", 0.2488),
];

/// 种子汇率的生效日
pub fn seed_fx_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 12, 20)
}

/// 本次写入的新记录数（已存在的不计）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub vendors: usize,
    pub products: usize,
    pub aliases: usize,
    pub fx_rates: usize,
}

/// 写入参考数据（幂等）
///
/// 顺序: 供应商 → 产品 → 别名（依赖前两者的外键）→ 汇率
pub fn seed_reference_data(conn: Arc<Mutex<Connection>>) -> RepositoryResult<SeedReport> {
    let reference_repo = ReferenceRepository::new(conn.clone());
    let alias_repo = ProductAliasRepository::new(conn.clone());
    let fx_repo = FxRateRepository::new(conn);

    let mut report = SeedReport::default();

    for (id, name, currency) in VENDORS {
        let vendor = Vendor {
            id: id.to_string(),
            name: name.to_string(),
            default_currency: currency.to_string(),
        };
        if reference_repo.insert_vendor_if_absent(&vendor)? {
            report.vendors += 1;
        }
    }

    for (id, name, category) in PRODUCTS {
        let product = Product {
            id: id.to_string(),
            canonical_name: name.to_string(),
            category: category.to_string(),
        };
        if reference_repo.insert_product_if_absent(&product)? {
            report.products += 1;
        }
    }

    for (vendor_id, vendor_sku, product_id, vendor_name_raw) in ALIASES {
        let alias = ProductAlias {
            vendor_id: vendor_id.to_string(),
            vendor_sku: vendor_sku.to_string(),
            product_id: product_id.to_string(),
            vendor_name_raw: Some(vendor_name_raw.to_string()),
        };
        if alias_repo.insert_if_absent(&alias)? {
            report.aliases += 1;
        }
    }

    if let Some(fx_date) = seed_fx_date() {
        for (base, quote, rate) in FX_RATES {
            let fx = FxRate {
                fx_date,
                base_currency: base.to_string(),
                quote_currency: quote.to_string(),
                rate,
            };
            if fx_repo.insert_if_absent(&fx)? {
                report.fx_rates += 1;
            }
        }
    }

    tracing::info!(
        vendors = report.vendors,
        products = report.products,
        aliases = report.aliases,
        fx_rates = report.fx_rates,
        "参考数据写入完成"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    #[test]
    fn test_seed_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let first = seed_reference_data(conn.clone()).unwrap();
        assert_eq!(
            first,
            SeedReport {
                vendors: 3,
                products: 6,
                aliases: 18,
                fx_rates: 4
            }
        );

        let second = seed_reference_data(conn.clone()).unwrap();
        assert_eq!(second, SeedReport::default());

        let alias_repo = ProductAliasRepository::new(conn);
        assert_eq!(alias_repo.count().unwrap(), 18);
        assert_eq!(
            alias_repo.find_product_id("V-B", "PN-4070-12G").unwrap(),
            Some("P-RTX4070".to_string())
        );
    }
}
