//! 庫存模型
//!
//! 庫存快照只能透過交易記錄（InventoryTransaction）變動，
//! 交易記錄是不可變的帳務底帳，快照是可重算的衍生視圖。

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PlanError, Result, SourceRef};

/// 交易類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// 預留（鎖定給訂單）
    Reservation,
    /// 生產/出貨消耗
    Consumption,
    /// 收貨入庫
    Receipt,
    /// 報廢（列印失敗等）
    Scrap,
    /// 釋放預留
    Release,
}

/// 庫存交易記錄（不可變、只增不改）
///
/// 符號約定：數量為負表示減少；預留與消耗以負數記錄。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryTransaction {
    /// 交易ID
    pub id: Uuid,

    /// 產品 SKU
    pub product_sku: String,

    /// 交易類型
    pub txn_type: TransactionType,

    /// 帶符號數量
    pub quantity: Decimal,

    /// 交易當下單位成本
    pub unit_cost: Decimal,

    /// 觸發單據
    pub source: SourceRef,

    /// 交易時間
    pub timestamp: DateTime<Utc>,

    /// 備註
    pub notes: Option<String>,
}

impl InventoryTransaction {
    /// 創建新的交易記錄
    pub fn new(
        product_sku: impl Into<String>,
        txn_type: TransactionType,
        quantity: Decimal,
        source: SourceRef,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_sku: product_sku.into(),
            txn_type,
            quantity,
            unit_cost: Decimal::ZERO,
            source,
            timestamp: Utc::now(),
            notes: None,
        }
    }

    /// 建構器模式：設置單位成本
    pub fn with_unit_cost(mut self, cost: Decimal) -> Self {
        self.unit_cost = cost;
        self
    }

    /// 建構器模式：設置備註
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 驗證符號約定
    pub fn validate(&self) -> Result<()> {
        if self.quantity == Decimal::ZERO {
            return Err(PlanError::Ledger(format!(
                "交易 {} 數量不得為 0",
                self.id
            )));
        }
        let sign_ok = match self.txn_type {
            TransactionType::Receipt | TransactionType::Release => {
                self.quantity > Decimal::ZERO
            }
            TransactionType::Reservation
            | TransactionType::Consumption
            | TransactionType::Scrap => self.quantity < Decimal::ZERO,
        };
        if !sign_ok {
            return Err(PlanError::Ledger(format!(
                "交易 {} 的符號不符合 {:?} 類型約定",
                self.id, self.txn_type
            )));
        }
        Ok(())
    }

    /// 該交易對現有庫存（on_hand）的影響量
    pub fn on_hand_delta(&self) -> Decimal {
        match self.txn_type {
            TransactionType::Receipt
            | TransactionType::Consumption
            | TransactionType::Scrap => self.quantity,
            TransactionType::Reservation | TransactionType::Release => Decimal::ZERO,
        }
    }
}

/// 庫存快照（每個產品一筆，全域池）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// 產品 SKU
    pub product_sku: String,

    /// 現有庫存
    pub on_hand: Decimal,

    /// 已分配數量（鎖定）
    pub allocated: Decimal,
}

impl Inventory {
    /// 創建新的庫存記錄
    pub fn new(product_sku: impl Into<String>, on_hand: Decimal) -> Self {
        Self {
            product_sku: product_sku.into(),
            on_hand,
            allocated: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置已分配數量
    pub fn with_allocated(mut self, allocated: Decimal) -> Self {
        self.allocated = allocated;
        self
    }

    /// 可用庫存 = 現有 − 已分配，夾至 0 不外露負值
    pub fn available(&self) -> Decimal {
        (self.on_hand - self.allocated).max(Decimal::ZERO)
    }

    /// 檢查是否超額分配（異常狀態，應觸發稽核）
    pub fn is_over_allocated(&self) -> bool {
        self.allocated > self.on_hand
    }

    /// 套用一筆交易到快照
    ///
    /// 消耗的是已預留的庫存，因此消耗同時釋放等量分配。
    pub fn apply(&mut self, txn: &InventoryTransaction) -> Result<()> {
        txn.validate()?;
        if txn.product_sku != self.product_sku {
            return Err(PlanError::Ledger(format!(
                "交易產品 {} 與快照產品 {} 不符",
                txn.product_sku, self.product_sku
            )));
        }

        let magnitude = txn.quantity.abs();
        match txn.txn_type {
            TransactionType::Receipt => {
                self.on_hand += magnitude;
            }
            TransactionType::Scrap => {
                if magnitude > self.on_hand {
                    return Err(PlanError::Ledger(format!(
                        "報廢數量 {} 超過現有庫存 {}",
                        magnitude, self.on_hand
                    )));
                }
                self.on_hand -= magnitude;
            }
            TransactionType::Reservation => {
                if magnitude > self.available() {
                    return Err(PlanError::Ledger(format!(
                        "預留數量 {} 超過可用庫存 {}",
                        magnitude,
                        self.available()
                    )));
                }
                self.allocated += magnitude;
            }
            TransactionType::Release => {
                if magnitude > self.allocated {
                    return Err(PlanError::Ledger(format!(
                        "釋放數量 {} 超過已分配數量 {}",
                        magnitude, self.allocated
                    )));
                }
                self.allocated -= magnitude;
            }
            TransactionType::Consumption => {
                if magnitude > self.allocated {
                    return Err(PlanError::Ledger(format!(
                        "消耗數量 {} 超過已分配數量 {}",
                        magnitude, self.allocated
                    )));
                }
                self.on_hand -= magnitude;
                self.allocated -= magnitude;
            }
        }
        Ok(())
    }
}
