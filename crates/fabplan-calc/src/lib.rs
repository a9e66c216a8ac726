//! # Fabplan Calculation Engine
//!
//! 核心 MRP 計算引擎：BOM 展開、淨需求、計劃訂單生成與運行編排。

pub mod explosion;
pub mod netting;
pub mod orchestrator;
pub mod pegging;
pub mod planning;

// Re-export 主要類型
pub use explosion::{ComponentRequirement, Explosion, ExplosionCalculator};
pub use netting::{NetRequirement, NettingCalculator};
pub use orchestrator::{MrpOrchestrator, RunRequest, RunScope};
pub use pegging::PeggingCalculator;
pub use planning::OrderPlanner;

/// MRP 運行結果
#[derive(Debug, Clone)]
pub struct PlanningResult {
    /// 運行稽核記錄（含統計）
    pub run: fabplan_core::MrpRun,

    /// 本次產生的計劃訂單
    pub planned_orders: Vec<fabplan_core::PlannedOrder>,

    /// 警告信息（跳過的壞單據、缺主檔的物料等）
    pub warnings: Vec<String>,
}
