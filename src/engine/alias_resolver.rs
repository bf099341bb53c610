// ==========================================
// 价格账本 ETL - 产品别名解析
// ==========================================
// 输入: (vendor_id, vendor_sku)
// 输出: Some(product_id) / None（未命中不是错误）
// 红线: Engine 不拼 SQL，查询经由 AliasLookup
// ==========================================

use crate::repository::error::RepositoryResult;
use std::sync::Arc;

/// 别名查询接口（由 ProductAliasRepository 实现）
pub trait AliasLookup: Send + Sync {
    fn find_product_id(&self, vendor_id: &str, vendor_sku: &str) -> RepositoryResult<Option<String>>;
}

pub struct AliasResolver {
    lookup: Arc<dyn AliasLookup>,
}

impl AliasResolver {
    pub fn new(lookup: Arc<dyn AliasLookup>) -> Self {
        Self { lookup }
    }

    /// 空 SKU 直接返回 None，不查表
    pub fn resolve(&self, vendor_id: &str, vendor_sku: &str) -> RepositoryResult<Option<String>> {
        if vendor_sku.is_empty() {
            return Ok(None);
        }
        self.lookup.find_product_id(vendor_id, vendor_sku)
    }
}
