//! 來源單據引用
//!
//! 封閉的標籤聯集，取代自由文字的 reference_type 字串，
//! 讓庫存交易與計劃訂單只能指向合法的單據種類。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 來源單據引用（需求追溯/交易引用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceRef {
    /// 銷售訂單
    SalesOrder(Uuid),
    /// 生產工單
    ProductionOrder(Uuid),
    /// 計劃訂單（中間層 BOM 展開的合成引用）
    PlannedOrder(Uuid),
    /// 銷售預測
    Forecast(Uuid),
    /// 人工調整（盤點等，無單據）
    Adjustment,
}

impl SourceRef {
    /// 檢查是否為獨立需求來源（客戶面）
    pub fn is_independent(&self) -> bool {
        matches!(
            self,
            SourceRef::SalesOrder(_) | SourceRef::ProductionOrder(_) | SourceRef::Forecast(_)
        )
    }

    /// 獲取單據 ID（人工調整無 ID）
    pub fn order_id(&self) -> Option<Uuid> {
        match self {
            SourceRef::SalesOrder(id)
            | SourceRef::ProductionOrder(id)
            | SourceRef::PlannedOrder(id)
            | SourceRef::Forecast(id) => Some(*id),
            SourceRef::Adjustment => None,
        }
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceRef::SalesOrder(id) => write!(f, "sales_order:{id}"),
            SourceRef::ProductionOrder(id) => write!(f, "production_order:{id}"),
            SourceRef::PlannedOrder(id) => write!(f, "planned_order:{id}"),
            SourceRef::Forecast(id) => write!(f, "forecast:{id}"),
            SourceRef::Adjustment => write!(f, "adjustment"),
        }
    }
}
