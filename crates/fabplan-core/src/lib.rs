//! # Fabplan Core
//!
//! 核心資料模型與類型定義：產品主檔、BOM、庫存、需求單據、
//! 計劃訂單與 MRP 運行記錄。

pub mod bom;
pub mod config;
pub mod demand;
pub mod inventory;
pub mod plan;
pub mod product;
pub mod repository;
pub mod run;
pub mod source;

// Re-export 主要類型
pub use bom::{Bom, BomIndex, BomLine, ConsumeStage};
pub use config::PlanningConfig;
pub use demand::{
    DemandLine, ProductionOrder, ProductionOrderStatus, SalesOrder, SalesOrderLine,
    SalesOrderStatus,
};
pub use inventory::{Inventory, InventoryTransaction, TransactionType};
pub use plan::{PeggingRecord, PlannedOrder, PlannedOrderStatus, PlannedOrderType};
pub use product::{Product, ProcurementType, UnitOfMeasure};
pub use repository::PlanRepository;
pub use run::{MrpRun, MrpRunStatus};
pub use source::SourceRef;

/// MRP 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("找不到產品: {0}")]
    ProductNotFound(String),

    #[error("BOM 循環引用: 產品 {product} (路徑: {path:?})")]
    BomCycle { product: String, path: Vec<String> },

    #[error("BOM 展開超過最大層數 {max_depth}: 產品 {product}")]
    BomDepthExceeded { product: String, max_depth: u32 },

    #[error("無效的數量: {0}")]
    InvalidQuantity(String),

    #[error("無效的計劃時界: {0} 天")]
    InvalidHorizon(i64),

    #[error("找不到單據: {0}")]
    OrderNotFound(uuid::Uuid),

    #[error("無效的狀態轉換: {from} → {to}")]
    InvalidTransition { from: String, to: String },

    #[error("帳務錯誤: {0}")]
    Ledger(String),

    #[error("存儲錯誤: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
