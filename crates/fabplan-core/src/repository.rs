//! 資料存取介面
//!
//! 把純計算（展開/淨算/計劃生成）與持久化完全解耦：
//! 引擎只透過這個 trait 讀寫資料，演算法可以在無資料庫下測試。

use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    BomIndex, Inventory, MrpRun, PlannedOrder, Product, ProductionOrder, Result, SalesOrder,
};

/// 計劃資料倉儲
///
/// MRP 對庫存永遠是唯讀的：交易記錄由訂單履行流程寫入，
/// 引擎只讀快照。計劃訂單的替換是唯一的寫入面，
/// `replace_planned_orders` 必須整體成功或整體失敗。
pub trait PlanRepository {
    /// 讀取產品主檔
    fn product(&self, sku: &str) -> Result<Option<Product>>;

    /// 讀取全部產品主檔（運行開始時一次載入）
    fn products(&self) -> Result<HashMap<String, Product>>;

    /// 建立啟用 BOM 索引（唯讀輸入）
    fn bom_index(&self) -> Result<BomIndex>;

    /// 讀取庫存快照（全域池，每產品一筆）
    fn inventory_snapshot(&self, skus: &[String]) -> Result<HashMap<String, Inventory>>;

    /// 讀取納入 MRP 的銷售訂單（狀態過濾由實作負責）
    fn open_sales_orders(&self) -> Result<Vec<SalesOrder>>;

    /// 讀取納入 MRP 的生產工單（狀態過濾由實作負責）
    fn open_production_orders(&self) -> Result<Vec<ProductionOrder>>;

    /// 依 ID 讀取銷售訂單（顯式範圍驗證用）
    fn sales_order(&self, id: Uuid) -> Result<Option<SalesOrder>>;

    /// 依 ID 讀取生產工單（顯式範圍驗證用）
    fn production_order(&self, id: Uuid) -> Result<Option<ProductionOrder>>;

    /// 讀取所有計劃訂單
    fn planned_orders(&self) -> Result<Vec<PlannedOrder>>;

    /// 原子替換：刪除所有 planned 狀態的舊計劃訂單
    /// （firmed/released/cancelled 不可動），插入新一代。
    /// 返回刪除的筆數。整批成功或整批失敗。
    fn replace_planned_orders(&self, run_id: Uuid, orders: Vec<PlannedOrder>) -> Result<u32>;

    /// 插入運行記錄
    fn insert_run(&self, run: &MrpRun) -> Result<()>;

    /// 更新運行記錄（只有編排器會呼叫）
    fn update_run(&self, run: &MrpRun) -> Result<()>;

    /// 依 ID 讀取運行記錄
    fn run(&self, id: Uuid) -> Result<Option<MrpRun>>;
}
