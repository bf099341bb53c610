// ==========================================
// 价格账本 ETL - 导入编排器
// ==========================================
// 运行状态机: RUNNING → {DONE, PARTIAL}
// 文件状态机: PENDING → {PROCESSED, FAILED}
// ==========================================
// 流程（每个待处理文件，按 ID 升序）:
// 1. 按 vendor_id 选择解析器；未知供应商 → FAILED
// 2. 逐行: 基础校验 → 别名解析 → 汇率换算 → 写价格 / 写拒收
// 3. 解析中途出现结构性错误 → FAILED，已写入的行保留
// 4. 行流结束 → PROCESSED（message = "ok"）
// 红线: 每行结果逐条提交，不开文件级事务
// ==========================================

use crate::domain::ledger::{NewPrice, RawIngestion, RunSummary};
use crate::domain::price_row::CanonicalPriceRow;
use crate::domain::types::{IngestionStatus, RejectReason, RunStatus, VendorFormat};
use crate::engine::alias_resolver::AliasResolver;
use crate::engine::error::{EtlError, EtlResult, FxError};
use crate::engine::fx_converter::CurrencyConverter;
use crate::engine::row_validator::validate_row;
use crate::importer::parser_for;
use crate::repository::{
    FxRateRepository, IngestionRepository, PriceRepository, ProductAliasRepository,
    RejectionRepository, RunRepository,
};
use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::instrument;

/// 单行判定结果
enum RowDecision {
    Load(NewPrice),
    Reject(RejectReason),
}

/// 运行内计数（含后续失败文件中已写入的行）
#[derive(Debug, Default)]
struct RunTally {
    processed_ingestions: i64,
    failed_ingestions: i64,
    loaded_rows: i64,
    rejected_rows: i64,
}

// ==========================================
// EtlRunner
// ==========================================
pub struct EtlRunner {
    ingestion_repo: IngestionRepository,
    price_repo: PriceRepository,
    rejection_repo: RejectionRepository,
    run_repo: RunRepository,
    alias_resolver: AliasResolver,
    fx_converter: CurrencyConverter,
    target_currency: String,
}

impl EtlRunner {
    /// # 参数
    /// - conn: 共享连接（所有仓储共用）
    /// - target_currency: 结算币种
    pub fn new(conn: Arc<Mutex<Connection>>, target_currency: &str) -> Self {
        Self {
            ingestion_repo: IngestionRepository::new(conn.clone()),
            price_repo: PriceRepository::new(conn.clone()),
            rejection_repo: RejectionRepository::new(conn.clone()),
            run_repo: RunRepository::new(conn.clone()),
            alias_resolver: AliasResolver::new(Arc::new(ProductAliasRepository::new(conn.clone()))),
            fx_converter: CurrencyConverter::new(Arc::new(FxRateRepository::new(conn))),
            target_currency: target_currency.trim().to_uppercase(),
        }
    }

    pub fn target_currency(&self) -> &str {
        &self.target_currency
    }

    /// 处理全部待导入文件（主入口）
    ///
    /// # 返回
    /// - Ok(RunSummary): 本次运行汇总
    /// - Err(EtlError): 运行级存储错误（建立/收尾运行、列出待处理、回写文件状态）
    #[instrument(skip(self), fields(target_currency = %self.target_currency))]
    pub fn run_all_pending(&self) -> EtlResult<RunSummary> {
        let run_id = self.run_repo.create_running(Utc::now().naive_utc())?;
        let pending = self.ingestion_repo.list_pending()?;
        tracing::info!(run_id, pending = pending.len(), "ETL 运行开始");

        let mut tally = RunTally::default();

        for ingestion in &pending {
            tally.processed_ingestions += 1;

            match self.process_ingestion(ingestion, &mut tally) {
                Ok(()) => {
                    self.ingestion_repo
                        .mark_finished(ingestion.id, IngestionStatus::Processed, "ok")?;
                    tracing::info!(
                        ingestion_id = ingestion.id,
                        vendor_id = %ingestion.vendor_id,
                        "文件处理完成"
                    );
                }
                Err(e) => {
                    tally.failed_ingestions += 1;
                    let message = e.to_string();
                    tracing::warn!(
                        ingestion_id = ingestion.id,
                        vendor_id = %ingestion.vendor_id,
                        "文件处理失败: {}",
                        message
                    );
                    self.ingestion_repo
                        .mark_finished(ingestion.id, IngestionStatus::Failed, &message)?;
                }
            }
        }

        let status = if tally.failed_ingestions > 0 {
            RunStatus::Partial
        } else {
            RunStatus::Done
        };

        let summary = RunSummary {
            run_id,
            status,
            processed_ingestions: tally.processed_ingestions,
            loaded_rows: tally.loaded_rows,
            rejected_rows: tally.rejected_rows,
        };
        self.run_repo.finalize(&summary, Utc::now().naive_utc())?;

        tracing::info!(
            run_id,
            status = %summary.status,
            processed = summary.processed_ingestions,
            loaded = summary.loaded_rows,
            rejected = summary.rejected_rows,
            "ETL 运行结束"
        );

        Ok(summary)
    }

    /// 处理单个文件；返回 Err 表示文件级失败
    fn process_ingestion(&self, ingestion: &RawIngestion, tally: &mut RunTally) -> EtlResult<()> {
        let format = VendorFormat::from_vendor_id(&ingestion.vendor_id)
            .ok_or_else(|| EtlError::UnknownVendor(ingestion.vendor_id.clone()))?;

        let rows = parser_for(format).open(Path::new(&ingestion.stored_path), &ingestion.vendor_id)?;

        for item in rows {
            let (row_number, row) = item?;

            match self.evaluate_row(ingestion.id, &row)? {
                RowDecision::Load(price) => {
                    self.price_repo.insert(&price)?;
                    tally.loaded_rows += 1;
                    tracing::debug!(
                        ingestion_id = ingestion.id,
                        row_number,
                        product_id = %price.product_id,
                        price_target = price.price_aed,
                        "行已入账"
                    );
                }
                RowDecision::Reject(reason) => {
                    let code = reason.code();
                    self.rejection_repo
                        .insert(ingestion.id, row_number, &code, &row.to_raw_json())?;
                    tally.rejected_rows += 1;
                    tracing::warn!(
                        ingestion_id = ingestion.id,
                        row_number,
                        reason = %code,
                        "行被拒收"
                    );
                }
            }
        }

        Ok(())
    }

    /// 单行判定: 基础校验 → 别名 → 汇率
    ///
    /// 存储错误向上传播（文件级），NoRate 转为拒收
    fn evaluate_row(&self, ingestion_id: i64, row: &CanonicalPriceRow) -> EtlResult<RowDecision> {
        if let Err(reason) = validate_row(row) {
            return Ok(RowDecision::Reject(reason));
        }

        let product_id = match self.alias_resolver.resolve(&row.vendor_id, &row.vendor_sku)? {
            Some(id) => id,
            None => return Ok(RowDecision::Reject(RejectReason::UnknownProductAlias)),
        };

        let price_aed = match self.fx_converter.convert(
            row.price,
            &row.currency,
            row.observed_at,
            &self.target_currency,
        ) {
            Ok(value) => value,
            Err(e @ FxError::NoRate { .. }) => {
                return Ok(RowDecision::Reject(RejectReason::FxError(e.to_string())))
            }
            Err(FxError::Lookup(e)) => return Err(EtlError::Repository(e)),
        };

        Ok(RowDecision::Load(NewPrice {
            product_id,
            vendor_id: row.vendor_id.clone(),
            observed_at: row.observed_at,
            currency: row.currency.clone(),
            price: row.price,
            price_aed,
            source_ingestion_id: ingestion_id,
        }))
    }
}
