//! 庫存帳務
//!
//! 交易記錄是只增不改的底帳，快照是可重算的快取：
//! 任何產品的現有庫存都必須能從交易總和對帳回來。
//! MRP 只讀快照，寫入一律來自訂單履行流程。

use fabplan_core::{Inventory, InventoryTransaction, PlanError, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 庫存帳
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    transactions: Vec<InventoryTransaction>,
    snapshots: HashMap<String, Inventory>,
}

impl InventoryLedger {
    /// 創建空帳
    pub fn new() -> Self {
        Self::default()
    }

    /// 以既有快照開帳（資料移轉/期初庫存）
    pub fn with_opening_balances(balances: impl IntoIterator<Item = Inventory>) -> Self {
        Self {
            transactions: Vec::new(),
            snapshots: balances
                .into_iter()
                .map(|inv| (inv.product_sku.clone(), inv))
                .collect(),
        }
    }

    /// 過帳一筆交易
    ///
    /// 先驗證符號約定再套用到快照；套用失敗則交易不入帳。
    pub fn post(&mut self, txn: InventoryTransaction) -> Result<()> {
        txn.validate()?;

        let snapshot = self
            .snapshots
            .entry(txn.product_sku.clone())
            .or_insert_with(|| Inventory::new(txn.product_sku.clone(), Decimal::ZERO));
        snapshot.apply(&txn)?;

        tracing::debug!(
            "過帳 {:?} {} × {}（{}）",
            txn.txn_type,
            txn.product_sku,
            txn.quantity,
            txn.source
        );
        self.transactions.push(txn);
        Ok(())
    }

    /// 讀取單一產品快照
    pub fn snapshot(&self, product_sku: &str) -> Option<&Inventory> {
        self.snapshots.get(product_sku)
    }

    /// 讀取全部快照（複本）
    pub fn snapshots(&self) -> HashMap<String, Inventory> {
        self.snapshots.clone()
    }

    /// 讀取某產品的交易歷史
    pub fn transactions(&self, product_sku: &str) -> Vec<&InventoryTransaction> {
        self.transactions
            .iter()
            .filter(|t| t.product_sku == product_sku)
            .collect()
    }

    /// 對帳：快照現有庫存必須等於期初 + 交易影響總和
    pub fn reconcile(&self, product_sku: &str, opening_on_hand: Decimal) -> Result<()> {
        let from_ledger: Decimal = self
            .transactions
            .iter()
            .filter(|t| t.product_sku == product_sku)
            .map(|t| t.on_hand_delta())
            .sum::<Decimal>()
            + opening_on_hand;

        let from_snapshot = self
            .snapshots
            .get(product_sku)
            .map(|inv| inv.on_hand)
            .unwrap_or(Decimal::ZERO);

        if from_ledger != from_snapshot {
            return Err(PlanError::Ledger(format!(
                "產品 {product_sku} 對帳不符：底帳 {from_ledger}，快照 {from_snapshot}"
            )));
        }
        Ok(())
    }
}
