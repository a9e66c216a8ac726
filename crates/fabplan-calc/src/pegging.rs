//! 需求追溯
//!
//! 把計劃訂單的數量分攤回觸發它的需求來源，
//! 建立「原料短缺 → 客戶訂單」的完整追溯鏈。

use fabplan_core::PeggingRecord;
use rust_decimal::Decimal;

/// 需求追溯計算器
pub struct PeggingCalculator;

impl PeggingCalculator {
    /// 把淨需求數量按順序分攤到需求來源
    ///
    /// 淨需求可能小於毛需求（部分被庫存吸收）：
    /// 依來源順序逐筆分攤，取 min(來源量, 剩餘量)，分攤完即停。
    pub fn allocate(net_quantity: Decimal, sources: &[PeggingRecord]) -> Vec<PeggingRecord> {
        let mut records = Vec::new();
        let mut remaining = net_quantity;

        for source in sources {
            if remaining <= Decimal::ZERO {
                break;
            }

            let pegged = source.quantity.min(remaining);
            if pegged <= Decimal::ZERO {
                continue;
            }

            records.push(
                PeggingRecord::new(source.demand, pegged).with_path(source.path.clone()),
            );
            remaining -= pegged;
        }

        records
    }
}
