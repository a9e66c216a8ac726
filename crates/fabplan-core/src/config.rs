//! 計劃配置
//!
//! 配置由呼叫端顯式注入編排器，不讀取全域狀態。

use serde::{Deserialize, Serialize};

use crate::ProcurementType;

/// 計劃引擎配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// 預設計劃時界（天）
    pub planning_horizon_days: u32,

    /// 產品未定義提前期時的預設值（天）
    pub default_lead_time_days: u32,

    /// 產品未定義採購類型時的預設值
    pub default_procurement: ProcurementType,

    /// BOM 展開最大層數（防禦壞資料）
    pub max_bom_depth: u32,
}

impl PlanningConfig {
    /// 建構器模式：設置預設計劃時界
    pub fn with_planning_horizon(mut self, days: u32) -> Self {
        self.planning_horizon_days = days;
        self
    }

    /// 建構器模式：設置預設提前期
    pub fn with_default_lead_time(mut self, days: u32) -> Self {
        self.default_lead_time_days = days;
        self
    }

    /// 建構器模式：設置最大展開層數
    pub fn with_max_bom_depth(mut self, depth: u32) -> Self {
        self.max_bom_depth = depth;
        self
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            planning_horizon_days: 30,
            default_lead_time_days: 0,
            default_procurement: ProcurementType::Buy,
            max_bom_depth: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlanningConfig::default();
        assert_eq!(config.planning_horizon_days, 30);
        assert_eq!(config.default_lead_time_days, 0);
        assert_eq!(config.default_procurement, ProcurementType::Buy);
        assert_eq!(config.max_bom_depth, 50);
    }

    #[test]
    fn test_builder() {
        let config = PlanningConfig::default()
            .with_planning_horizon(60)
            .with_max_bom_depth(10);

        assert_eq!(config.planning_horizon_days, 60);
        assert_eq!(config.max_bom_depth, 10);
    }
}
