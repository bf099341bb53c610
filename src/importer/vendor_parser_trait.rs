// ==========================================
// 价格账本 ETL - 供应商解析器 Trait
// ==========================================
// 职责: 定义“文件 → 规范化价格行”的惰性解析接口
// ==========================================

use crate::domain::price_row::NumberedRow;
use crate::domain::types::VendorFormat;
use crate::importer::error::ImportResult;
use std::path::Path;

/// 惰性行流: 有限、单次遍历、按文件原始顺序
///
/// - Ok((行号, 行)): 正常产出
/// - Err: 结构错误，之后流即结束
pub type RowStream = Box<dyn Iterator<Item = ImportResult<NumberedRow>>>;

// ==========================================
// VendorParser Trait
// ==========================================
// 实现者: VendorAParser / VendorBParser / VendorCParser
pub trait VendorParser: Send + Sync {
    /// 该解析器对应的供应商格式
    fn format(&self) -> VendorFormat;

    /// 打开文件并返回行流
    ///
    /// # 参数
    /// - file_path: 已落盘的文件路径
    /// - vendor_id: 写入每一行的供应商 ID
    ///
    /// # 返回
    /// - Ok(RowStream): 每次导入尝试都重新打开，不可中途重启
    /// - Err: 文件无法打开或整体无法解码（整个导入文件失败）
    fn open(&self, file_path: &Path, vendor_id: &str) -> ImportResult<RowStream>;
}
