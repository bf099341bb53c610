// ==========================================
// 价格账本 ETL - 表格型 (CSV) 价格文件公共读取
// ==========================================
// 用途: Format A / Format C 只在列名上不同，遍历规则一致
// 行号: 表头占第 1 行，首条数据行号为 2
// ==========================================

use crate::domain::price_row::{CanonicalPriceRow, NumberedRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_cleaner::{
    clean_currency, clean_text, normalize_null, parse_observed_at, parse_price,
};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 首条数据行的行号（表头为第 1 行）
pub const FIRST_DATA_ROW: usize = 2;

/// 供应商 CSV 列名映射
#[derive(Debug, Clone, Copy)]
pub struct CsvColumns {
    pub sku: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub currency: &'static str,
    pub observed_at: &'static str,
}

// ==========================================
// CsvPriceStream - 惰性行迭代器
// ==========================================
pub struct CsvPriceStream {
    vendor_id: String,
    columns: CsvColumns,
    header_index: HashMap<String, usize>,
    records: StringRecordsIntoIter<File>,
    next_row: usize,
    finished: bool,
}

impl CsvPriceStream {
    /// 打开 CSV 文件并读取表头
    pub fn open(file_path: &Path, vendor_id: &str, columns: CsvColumns) -> ImportResult<Self> {
        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致，缺列按缺失处理
            .from_reader(file);

        let header_index = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.trim().to_string(), idx))
            .collect();

        Ok(Self {
            vendor_id: vendor_id.to_string(),
            columns,
            header_index,
            records: reader.into_records(),
            next_row: FIRST_DATA_ROW,
            finished: false,
        })
    }

    fn field<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.header_index
            .get(column)
            .and_then(|idx| record.get(*idx))
    }

    fn map_record(&self, record: &StringRecord, row: usize) -> ImportResult<CanonicalPriceRow> {
        let c = self.columns;
        Ok(CanonicalPriceRow {
            vendor_id: self.vendor_id.clone(),
            vendor_sku: clean_text(self.field(record, c.sku)),
            vendor_name_raw: normalize_null(self.field(record, c.name)),
            price: parse_price(self.field(record, c.price), row, c.price)?,
            currency: clean_currency(self.field(record, c.currency)),
            observed_at: parse_observed_at(self.field(record, c.observed_at), row, c.observed_at)?,
        })
    }
}

impl Iterator for CsvPriceStream {
    type Item = ImportResult<NumberedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let row = self.next_row;
        let result = match self.records.next()? {
            Ok(record) => self.map_record(&record, row).map(|r| (row, r)),
            Err(e) => Err(ImportError::MalformedRecord {
                row,
                message: e.to_string(),
            }),
        };

        // 结构错误后不再继续产出
        if result.is_err() {
            self.finished = true;
        }
        self.next_row += 1;
        Some(result)
    }
}
