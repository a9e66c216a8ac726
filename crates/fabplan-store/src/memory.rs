//! 記憶體內倉儲
//!
//! `PlanRepository` 的參考實作：支撐無資料庫的單元/集成測試，
//! 也可作為尚未接資料庫的嵌入端暫用後端。
//! `replace_planned_orders` 在單一鎖下整批完成，符合
//! 「整批成功或整批失敗」的交易邊界。

use fabplan_core::{
    Bom, BomIndex, Inventory, InventoryTransaction, MrpRun, PlanError, PlanRepository,
    PlannedOrder, PlannedOrderStatus, Product, ProductionOrder, Result, SalesOrder,
};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::InventoryLedger;

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<String, Product>,
    boms: Vec<Bom>,
    ledger: InventoryLedger,
    sales_orders: HashMap<Uuid, SalesOrder>,
    production_orders: HashMap<Uuid, ProductionOrder>,
    planned_orders: HashMap<Uuid, PlannedOrder>,
    runs: HashMap<Uuid, MrpRun>,
}

/// 記憶體內倉儲
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// 創建空倉儲
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PlanError::Storage("倉儲鎖已毒化".to_string()))
    }

    /// 新增產品主檔
    pub fn add_product(&self, product: Product) -> Result<()> {
        let mut inner = self.lock()?;
        inner.products.insert(product.sku.clone(), product);
        Ok(())
    }

    /// 新增 BOM
    pub fn add_bom(&self, bom: Bom) -> Result<()> {
        self.lock()?.boms.push(bom);
        Ok(())
    }

    /// 直接設置庫存快照（測試/期初資料用）
    pub fn set_inventory(&self, inventory: Inventory) -> Result<()> {
        let mut inner = self.lock()?;
        let mut snapshots: Vec<Inventory> = inner.ledger.snapshots().into_values().collect();
        snapshots.retain(|inv| inv.product_sku != inventory.product_sku);
        snapshots.push(inventory);
        inner.ledger = InventoryLedger::with_opening_balances(snapshots);
        Ok(())
    }

    /// 過帳庫存交易（訂單履行流程的寫入面）
    pub fn post_transaction(&self, txn: InventoryTransaction) -> Result<()> {
        self.lock()?.ledger.post(txn)
    }

    /// 新增銷售訂單
    pub fn add_sales_order(&self, order: SalesOrder) -> Result<Uuid> {
        let mut inner = self.lock()?;
        let id = order.id;
        inner.sales_orders.insert(id, order);
        Ok(id)
    }

    /// 新增生產工單
    pub fn add_production_order(&self, order: ProductionOrder) -> Result<Uuid> {
        let mut inner = self.lock()?;
        let id = order.id;
        inner.production_orders.insert(id, order);
        Ok(id)
    }

    /// 確認計劃訂單（使用者動作：鎖定不被重建）
    pub fn firm_planned_order(&self, id: Uuid) -> Result<()> {
        let mut inner = self.lock()?;
        let order = inner
            .planned_orders
            .get_mut(&id)
            .ok_or(PlanError::OrderNotFound(id))?;
        order.firm()
    }

    /// 下達計劃訂單（轉為真實單據）
    pub fn release_planned_order(&self, id: Uuid, converted_order_id: Uuid) -> Result<()> {
        let mut inner = self.lock()?;
        let order = inner
            .planned_orders
            .get_mut(&id)
            .ok_or(PlanError::OrderNotFound(id))?;
        order.release(converted_order_id)
    }

    /// 取消計劃訂單
    pub fn cancel_planned_order(&self, id: Uuid) -> Result<()> {
        let mut inner = self.lock()?;
        let order = inner
            .planned_orders
            .get_mut(&id)
            .ok_or(PlanError::OrderNotFound(id))?;
        order.cancel()
    }

    /// 讀取全部運行記錄（測試/報表用）
    pub fn runs(&self) -> Result<Vec<MrpRun>> {
        Ok(self.lock()?.runs.values().cloned().collect())
    }
}

impl PlanRepository for MemoryStore {
    fn product(&self, sku: &str) -> Result<Option<Product>> {
        Ok(self.lock()?.products.get(sku).cloned())
    }

    fn products(&self) -> Result<HashMap<String, Product>> {
        Ok(self.lock()?.products.clone())
    }

    fn bom_index(&self) -> Result<BomIndex> {
        BomIndex::build(self.lock()?.boms.clone())
    }

    fn inventory_snapshot(&self, skus: &[String]) -> Result<HashMap<String, Inventory>> {
        let inner = self.lock()?;
        let all = inner.ledger.snapshots();
        Ok(all
            .into_iter()
            .filter(|(sku, _)| skus.contains(sku))
            .collect())
    }

    fn open_sales_orders(&self) -> Result<Vec<SalesOrder>> {
        Ok(self
            .lock()?
            .sales_orders
            .values()
            .filter(|o| o.is_mrp_relevant())
            .cloned()
            .collect())
    }

    fn open_production_orders(&self) -> Result<Vec<ProductionOrder>> {
        Ok(self
            .lock()?
            .production_orders
            .values()
            .filter(|o| o.is_mrp_relevant())
            .cloned()
            .collect())
    }

    fn sales_order(&self, id: Uuid) -> Result<Option<SalesOrder>> {
        Ok(self.lock()?.sales_orders.get(&id).cloned())
    }

    fn production_order(&self, id: Uuid) -> Result<Option<ProductionOrder>> {
        Ok(self.lock()?.production_orders.get(&id).cloned())
    }

    fn planned_orders(&self) -> Result<Vec<PlannedOrder>> {
        let inner = self.lock()?;
        let mut orders: Vec<PlannedOrder> = inner.planned_orders.values().cloned().collect();
        // 穩定輸出順序
        orders.sort_by(|a, b| a.product_sku.cmp(&b.product_sku).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    fn replace_planned_orders(&self, _run_id: Uuid, orders: Vec<PlannedOrder>) -> Result<u32> {
        let mut inner = self.lock()?;

        // 單一鎖下整批完成：刪 planned、插新單，不存在部分套用
        let before = inner.planned_orders.len();
        inner
            .planned_orders
            .retain(|_, o| o.status != PlannedOrderStatus::Planned);
        let deleted = (before - inner.planned_orders.len()) as u32;

        for order in orders {
            inner.planned_orders.insert(order.id, order);
        }
        Ok(deleted)
    }

    fn insert_run(&self, run: &MrpRun) -> Result<()> {
        self.lock()?.runs.insert(run.id, run.clone());
        Ok(())
    }

    fn update_run(&self, run: &MrpRun) -> Result<()> {
        let mut inner = self.lock()?;
        if !inner.runs.contains_key(&run.id) {
            return Err(PlanError::OrderNotFound(run.id));
        }
        inner.runs.insert(run.id, run.clone());
        Ok(())
    }

    fn run(&self, id: Uuid) -> Result<Option<MrpRun>> {
        Ok(self.lock()?.runs.get(&id).cloned())
    }
}
