// ==========================================
// 价格账本 ETL - 业务 API
// ==========================================
// 职责: 上传登记 / 触发运行 / 重新排队 / 读侧查询
// ==========================================

use crate::api::dto::{
    CheapestEntry, HistoryPoint, IngestUploadResponse, PriceHistory, ProductComparison,
    RequeueResponse, VendorQuote,
};
use crate::api::error::{ApiError, ApiResult};
use crate::config::EtlConfig;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::ledger::{EtlRun, Price, RawIngestion, Rejection, RunSummary};
use crate::domain::reference::Product;
use crate::domain::types::{IngestionStatus, VendorFormat};
use crate::engine::EtlRunner;
use crate::importer::save_upload_bytes;
use crate::repository::{
    IngestionRepository, PriceQueryRepository, ReferenceRepository, RejectionRepository,
    RepositoryError, RunRepository,
};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 上传文件列表默认条数
pub const DEFAULT_INGESTION_LIMIT: usize = 50;
/// 拒收记录列表默认条数
pub const DEFAULT_REJECTION_LIMIT: usize = 100;

// ==========================================
// EtlApi
// ==========================================
pub struct EtlApi {
    config: EtlConfig,
    conn: Arc<Mutex<Connection>>,
    runner: EtlRunner,
    ingestion_repo: IngestionRepository,
    rejection_repo: RejectionRepository,
    run_repo: RunRepository,
    reference_repo: ReferenceRepository,
    query_repo: PriceQueryRepository,
}

impl EtlApi {
    pub fn new(conn: Arc<Mutex<Connection>>, config: EtlConfig) -> Self {
        Self {
            runner: EtlRunner::new(conn.clone(), &config.target_currency),
            ingestion_repo: IngestionRepository::new(conn.clone()),
            rejection_repo: RejectionRepository::new(conn.clone()),
            run_repo: RunRepository::new(conn.clone()),
            reference_repo: ReferenceRepository::new(conn.clone()),
            query_repo: PriceQueryRepository::new(conn.clone()),
            conn,
            config,
        }
    }

    /// 按配置打开数据库并初始化表结构
    pub fn open(config: EtlConfig) -> ApiResult<Self> {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ApiError::StorageError(format!("创建数据库目录失败: {}: {}", parent.display(), e))
                })?;
            }
        }
        let conn = open_sqlite_connection(&config.db_path).map_err(RepositoryError::from)?;
        init_schema(&conn).map_err(RepositoryError::from)?;
        tracing::info!("数据库已就绪: {}", config.db_path);
        Ok(Self::new(Arc::new(Mutex::new(conn)), config))
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    // ==========================================
    // 写入侧
    // ==========================================

    /// 上传登记
    ///
    /// # 参数
    /// - vendor_key: vendor_a / vendor_b / vendor_c（忽略大小写与首尾空白）
    /// - file_name: 原始文件名（为空时按 "upload" 登记）
    /// - data: 文件内容（不可为空）
    pub fn ingest_upload(
        &self,
        vendor_key: &str,
        file_name: &str,
        data: &[u8],
    ) -> ApiResult<IngestUploadResponse> {
        let format = VendorFormat::from_vendor_key(vendor_key).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "未知供应商: {}（可选: vendor_a, vendor_b, vendor_c）",
                vendor_key.trim()
            ))
        })?;

        if data.is_empty() {
            return Err(ApiError::InvalidInput("上传文件为空".to_string()));
        }

        let file_name = file_name.trim();
        let (registered_name, storage_name) = if file_name.is_empty() {
            ("upload".to_string(), format!("{}.dat", format.vendor_key()))
        } else {
            (file_name.to_string(), file_name.to_string())
        };

        let stored = save_upload_bytes(&self.config.storage_dir, &storage_name, data)?;
        let stored_path = stored.to_string_lossy().to_string();

        let ingestion_id =
            self.ingestion_repo
                .insert_pending(format.vendor_id(), &registered_name, &stored_path)?;

        tracing::info!(
            ingestion_id,
            vendor_id = format.vendor_id(),
            stored_path = %stored_path,
            "上传文件已登记"
        );

        Ok(IngestUploadResponse {
            ingestion_id,
            vendor_id: format.vendor_id().to_string(),
            stored_path,
            status: IngestionStatus::Pending,
        })
    }

    /// 处理全部待导入文件
    pub fn run_etl(&self) -> ApiResult<RunSummary> {
        Ok(self.runner.run_all_pending()?)
    }

    /// 重新排队: 清除该文件已产出的记录，下次运行重新处理
    pub fn requeue_ingestion(&self, ingestion_id: i64) -> ApiResult<RequeueResponse> {
        let (deleted_prices, deleted_rejections) = self.ingestion_repo.requeue(ingestion_id)?;

        tracing::info!(
            ingestion_id,
            deleted_prices,
            deleted_rejections,
            "文件已重新排队"
        );

        Ok(RequeueResponse {
            ingestion_id,
            deleted_prices,
            deleted_rejections,
            status: IngestionStatus::Pending,
        })
    }

    // ==========================================
    // 读取侧
    // ==========================================

    pub fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.reference_repo.list_products()?)
    }

    /// 各产品最低价
    ///
    /// 口径: 每个 (产品, 供应商) 取最新一次报价，再取最低；并列全部列出
    pub fn cheapest(&self) -> ApiResult<Vec<CheapestEntry>> {
        let names: HashMap<String, String> = self
            .reference_repo
            .list_products()?
            .into_iter()
            .map(|p| (p.id, p.canonical_name))
            .collect();

        // 已按产品、结算价升序排列
        let latest = self.query_repo.latest_per_product_vendor()?;

        let mut entries: Vec<CheapestEntry> = Vec::new();
        for price in latest {
            match entries.last_mut() {
                Some(entry) if entry.product_id == price.product_id => {
                    if price.price_aed == entry.cheapest_target {
                        entry.vendors.push(quote_of(&price));
                    }
                }
                _ => {
                    let product = names
                        .get(&price.product_id)
                        .cloned()
                        .unwrap_or_else(|| price.product_id.clone());
                    entries.push(CheapestEntry {
                        product_id: price.product_id.clone(),
                        product,
                        cheapest_target: price.price_aed,
                        vendors: vec![quote_of(&price)],
                    });
                }
            }
        }

        Ok(entries)
    }

    /// 单产品比价（各供应商最新报价 + 价差）
    pub fn compare(&self, product_id: &str) -> ApiResult<ProductComparison> {
        let product = self.require_product(product_id)?;
        let vendors: Vec<VendorQuote> = self
            .query_repo
            .latest_for_product(product_id)?
            .iter()
            .map(quote_of)
            .collect();

        let (spread_target, spread_pct) = spread_of(&vendors);

        Ok(ProductComparison {
            product_id: product.id,
            product: product.canonical_name,
            vendors,
            spread_target,
            spread_pct,
        })
    }

    /// 单产品价格历史（按观测时间升序）
    pub fn history(&self, product_id: &str) -> ApiResult<PriceHistory> {
        let product = self.require_product(product_id)?;
        let points = self
            .query_repo
            .history(product_id)?
            .into_iter()
            .map(|p| HistoryPoint {
                vendor_id: p.vendor_id,
                t: p.observed_at,
                price_target: p.price_aed,
            })
            .collect();

        Ok(PriceHistory {
            product_id: product.id,
            product: product.canonical_name,
            points,
        })
    }

    /// 最近上传的文件（默认 50 条，新的在前）
    pub fn list_ingestions(&self, limit: Option<usize>) -> ApiResult<Vec<RawIngestion>> {
        let limit = limit.unwrap_or(DEFAULT_INGESTION_LIMIT);
        Ok(self.ingestion_repo.list_recent(limit)?)
    }

    /// 最近的拒收记录（默认 100 条，新的在前）
    pub fn list_rejections(&self, limit: Option<usize>) -> ApiResult<Vec<Rejection>> {
        let limit = limit.unwrap_or(DEFAULT_REJECTION_LIMIT);
        Ok(self.rejection_repo.list_recent(limit)?)
    }

    pub fn get_ingestion(&self, ingestion_id: i64) -> ApiResult<RawIngestion> {
        self.ingestion_repo
            .find_by_id(ingestion_id)?
            .ok_or_else(|| ApiError::NotFound(format!("RawIngestion(id={})不存在", ingestion_id)))
    }

    pub fn get_run(&self, run_id: i64) -> ApiResult<EtlRun> {
        self.run_repo
            .find_by_id(run_id)?
            .ok_or_else(|| ApiError::NotFound(format!("EtlRun(id={})不存在", run_id)))
    }

    fn require_product(&self, product_id: &str) -> ApiResult<Product> {
        self.reference_repo
            .find_product(product_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Product(id={})不存在", product_id)))
    }
}

fn quote_of(price: &Price) -> VendorQuote {
    VendorQuote {
        vendor_id: price.vendor_id.clone(),
        price_target: price.price_aed,
        as_of: price.observed_at,
    }
}

/// 价差: (max - min, 价差 / min × 100)；min ≤ 0 时百分比为 None
fn spread_of(quotes: &[VendorQuote]) -> (Option<f64>, Option<f64>) {
    if quotes.is_empty() {
        return (None, None);
    }

    let min = quotes
        .iter()
        .map(|q| q.price_target)
        .fold(f64::INFINITY, f64::min);
    let max = quotes
        .iter()
        .map(|q| q.price_target)
        .fold(f64::NEG_INFINITY, f64::max);

    let spread = max - min;
    let pct = if min > 0.0 {
        Some(spread / min * 100.0)
    } else {
        None
    };
    (Some(spread), pct)
}
