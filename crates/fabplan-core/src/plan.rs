//! 計劃訂單模型
//!
//! 計劃訂單是 MRP 的建議產出，不是已承諾的真實單據。
//! 生命週期：planned → firmed → released，任一時點可取消。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PlanError, Result, SourceRef};

/// 計劃訂單類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedOrderType {
    /// 採購
    Purchase,
    /// 生產
    Production,
}

/// 計劃訂單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedOrderStatus {
    /// 計劃中（下次運行可刪除重建）
    Planned,
    /// 已確認（使用者鎖定，重建時不可動）
    Firmed,
    /// 已下達（已轉為真實採購單/工單）
    Released,
    /// 已取消
    Cancelled,
}

impl std::fmt::Display for PlannedOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlannedOrderStatus::Planned => "planned",
            PlannedOrderStatus::Firmed => "firmed",
            PlannedOrderStatus::Released => "released",
            PlannedOrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// 需求追溯記錄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeggingRecord {
    /// 源需求單據
    pub demand: SourceRef,

    /// 追溯數量
    pub quantity: Decimal,

    /// 追溯路徑（頂層產品 → … → 子件）
    pub path: Vec<String>,
}

impl PeggingRecord {
    /// 創建新的追溯記錄
    pub fn new(demand: SourceRef, quantity: Decimal) -> Self {
        Self {
            demand,
            quantity,
            path: Vec::new(),
        }
    }

    /// 建構器模式：設置追溯路徑
    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    /// 獲取追溯深度（層級）
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// 計劃訂單（MRP 計算結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedOrder {
    /// 計劃訂單ID
    pub id: Uuid,

    /// 訂單類型
    pub order_type: PlannedOrderType,

    /// 產品 SKU
    pub product_sku: String,

    /// 計劃數量
    pub quantity: Decimal,

    /// 需求日期（完成日期）
    pub due_date: NaiveDate,

    /// 開始日期（= 需求日期 − 提前期，夾至運行日）
    pub start_date: NaiveDate,

    /// 開始日期被夾至運行日（已逾期/有風險）
    pub past_due: bool,

    /// 源需求單據（pegging）
    pub source: SourceRef,

    /// 所屬 MRP 運行
    pub mrp_run_id: Uuid,

    /// 狀態
    pub status: PlannedOrderStatus,

    /// 下達後的真實單據 ID
    pub converted_order_id: Option<Uuid>,

    /// 需求追溯
    pub pegging: Vec<PeggingRecord>,
}

impl PlannedOrder {
    /// 創建新的計劃訂單（初始為 planned）
    pub fn new(
        order_type: PlannedOrderType,
        product_sku: impl Into<String>,
        quantity: Decimal,
        due_date: NaiveDate,
        start_date: NaiveDate,
        source: SourceRef,
        mrp_run_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_type,
            product_sku: product_sku.into(),
            quantity,
            due_date,
            start_date,
            past_due: false,
            source,
            mrp_run_id,
            status: PlannedOrderStatus::Planned,
            converted_order_id: None,
            pegging: Vec::new(),
        }
    }

    /// 建構器模式：標記為逾期風險
    pub fn with_past_due(mut self, past_due: bool) -> Self {
        self.past_due = past_due;
        self
    }

    /// 建構器模式：設置需求追溯
    pub fn with_pegging(mut self, pegging: Vec<PeggingRecord>) -> Self {
        self.pegging = pegging;
        self
    }

    /// 確認（鎖定，下次 MRP 運行不得刪除）
    pub fn firm(&mut self) -> Result<()> {
        if self.status != PlannedOrderStatus::Planned {
            return Err(self.invalid_transition(PlannedOrderStatus::Firmed));
        }
        self.status = PlannedOrderStatus::Firmed;
        Ok(())
    }

    /// 下達（轉為真實採購單/工單）
    pub fn release(&mut self, converted_order_id: Uuid) -> Result<()> {
        if !matches!(
            self.status,
            PlannedOrderStatus::Planned | PlannedOrderStatus::Firmed
        ) {
            return Err(self.invalid_transition(PlannedOrderStatus::Released));
        }
        self.status = PlannedOrderStatus::Released;
        self.converted_order_id = Some(converted_order_id);
        Ok(())
    }

    /// 取消（任一時點皆可，除了已取消）
    pub fn cancel(&mut self) -> Result<()> {
        if self.status == PlannedOrderStatus::Cancelled {
            return Err(self.invalid_transition(PlannedOrderStatus::Cancelled));
        }
        self.status = PlannedOrderStatus::Cancelled;
        Ok(())
    }

    /// 檢查下次運行是否可刪除重建（只有 planned 可以）
    pub fn is_regenerable(&self) -> bool {
        self.status == PlannedOrderStatus::Planned
    }

    /// 檢查是否為採購建議
    pub fn is_purchase(&self) -> bool {
        self.order_type == PlannedOrderType::Purchase
    }

    /// 檢查是否為生產建議
    pub fn is_production(&self) -> bool {
        self.order_type == PlannedOrderType::Production
    }

    fn invalid_transition(&self, to: PlannedOrderStatus) -> PlanError {
        PlanError::InvalidTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}
