//! 淨需求計算
//!
//! 毛需求對可用庫存與安全庫存軋差：
//! 淨需求 = max(0, 毛需求 + 安全庫存 − 可用庫存)。
//! 每個產品一個全域庫存池，跨單據只軋一次。

use chrono::NaiveDate;
use fabplan_core::{Inventory, PeggingRecord, Product};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::Explosion;

/// 淨需求計算結果（每物料一筆）
#[derive(Debug, Clone)]
pub struct NetRequirement {
    /// 產品 SKU
    pub product_sku: String,

    /// 毛需求
    pub gross_requirement: Decimal,

    /// 可用庫存（現有 − 已分配，夾至 0）
    pub available: Decimal,

    /// 安全庫存
    pub safety_stock: Decimal,

    /// 淨需求（短缺；0 表示庫存足夠）
    pub net_requirement: Decimal,

    /// 需求日期
    pub due_date: NaiveDate,

    /// 需求來源明細
    pub sources: Vec<PeggingRecord>,
}

impl NetRequirement {
    /// 檢查是否存在短缺
    pub fn is_shortage(&self) -> bool {
        self.net_requirement > Decimal::ZERO
    }
}

/// 淨需求計算器
pub struct NettingCalculator;

impl NettingCalculator {
    /// 對展開後的毛需求逐物料軋差
    ///
    /// 缺庫存記錄視為零庫存；缺主檔視為零安全庫存。
    /// 純函數：只讀快照，不產生副作用。
    pub fn calculate(
        explosion: &Explosion,
        snapshot: &HashMap<String, Inventory>,
        products: &HashMap<String, Product>,
    ) -> Vec<NetRequirement> {
        explosion
            .iter()
            .map(|req| {
                let available = snapshot
                    .get(&req.product_sku)
                    .map(|inv| inv.available())
                    .unwrap_or(Decimal::ZERO);

                let safety_stock = products
                    .get(&req.product_sku)
                    .map(|p| p.safety_stock)
                    .unwrap_or(Decimal::ZERO);

                let net = (req.quantity + safety_stock - available).max(Decimal::ZERO);

                tracing::debug!(
                    "淨算 {}: 毛需求 {} + 安全庫存 {} − 可用 {} → 淨需求 {}",
                    req.product_sku,
                    req.quantity,
                    safety_stock,
                    available,
                    net
                );

                NetRequirement {
                    product_sku: req.product_sku.clone(),
                    gross_requirement: req.quantity,
                    available,
                    safety_stock,
                    net_requirement: net,
                    due_date: req.due_date,
                    sources: req.sources.clone(),
                }
            })
            .collect()
    }
}
