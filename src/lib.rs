//! # Fabplan
//!
//! 3D 列印工場的 MRP 計劃引擎：BOM 展開、淨需求計算、
//! 計劃訂單生成與運行編排，對關聯式資料的純計算核心。
//!
//! - [`fabplan_core`] — 資料模型、錯誤類型與倉儲介面
//! - [`fabplan_calc`] — 展開/淨算/生單/編排的純計算引擎
//! - [`fabplan_store`] — 庫存帳務與記憶體內倉儲實作

pub use fabplan_calc::{
    ComponentRequirement, Explosion, ExplosionCalculator, MrpOrchestrator, NetRequirement,
    NettingCalculator, OrderPlanner, PeggingCalculator, PlanningResult, RunRequest, RunScope,
};
pub use fabplan_core::{
    Bom, BomIndex, BomLine, ConsumeStage, DemandLine, Inventory, InventoryTransaction, MrpRun,
    MrpRunStatus, PeggingRecord, PlanError, PlanRepository, PlannedOrder, PlannedOrderStatus,
    PlannedOrderType, PlanningConfig, ProcurementType, Product, ProductionOrder,
    ProductionOrderStatus, Result, SalesOrder, SalesOrderLine, SalesOrderStatus, SourceRef,
    TransactionType, UnitOfMeasure,
};
pub use fabplan_store::{InventoryLedger, MemoryStore};
