// ==========================================
// 价格账本 ETL - 引擎层错误类型
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use thiserror::Error;

// ==========================================
// FxError - 汇率换算错误
// ==========================================
// NoRate 为行级错误（落拒收）；Lookup 为文件级错误
#[derive(Error, Debug)]
pub enum FxError {
    #[error("No FX rate for {from}↔{to} on {date}")]
    NoRate {
        from: String,
        to: String,
        date: NaiveDate,
    },

    #[error("汇率查询失败: {0}")]
    Lookup(#[from] RepositoryError),
}

// ==========================================
// EtlError - 编排错误
// ==========================================
// 文件级错误写入 raw_ingestions.message；
// 运行级错误（建立/收尾运行记录等）直接返回调用方
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Unknown vendor_id: {0}")]
    UnknownVendor(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type EtlResult<T> = Result<T, EtlError>;
