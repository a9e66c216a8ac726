//! 計劃訂單生成
//!
//! 把淨需求短缺轉成計劃訂單：採購類型決定單別，
//! 開始日期 = 需求日期 − 提前期，早於運行日則夾至運行日並標記逾期。

use chrono::{Duration, NaiveDate};
use fabplan_core::{
    PlannedOrder, PlannedOrderType, PlanningConfig, ProcurementType, Product,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{NetRequirement, PeggingCalculator};

/// 計劃訂單生成器
pub struct OrderPlanner<'a> {
    products: &'a HashMap<String, Product>,
    config: &'a PlanningConfig,
}

impl<'a> OrderPlanner<'a> {
    /// 創建新的生成器
    pub fn new(products: &'a HashMap<String, Product>, config: &'a PlanningConfig) -> Self {
        Self { products, config }
    }

    /// 為所有短缺生成計劃訂單（淨需求為 0 的物料不生單）
    pub fn plan(
        &self,
        net_requirements: &[NetRequirement],
        run_id: Uuid,
        run_date: NaiveDate,
        warnings: &mut Vec<String>,
    ) -> Vec<PlannedOrder> {
        net_requirements
            .iter()
            .filter(|net| net.is_shortage())
            .map(|net| self.plan_one(net, run_id, run_date, warnings))
            .collect()
    }

    /// 單筆短缺 → 計劃訂單
    fn plan_one(
        &self,
        net: &NetRequirement,
        run_id: Uuid,
        run_date: NaiveDate,
        warnings: &mut Vec<String>,
    ) -> PlannedOrder {
        let product = self.products.get(&net.product_sku);

        let procurement = match product {
            Some(p) => p.procurement_type,
            None => {
                warnings.push(format!(
                    "產品 {} 缺主檔，採購類型以 {:?} 代入",
                    net.product_sku, self.config.default_procurement
                ));
                self.config.default_procurement
            }
        };

        let order_type = match procurement {
            ProcurementType::Buy => PlannedOrderType::Purchase,
            ProcurementType::Make => PlannedOrderType::Production,
        };

        let lead_time_days = product
            .map(|p| p.lead_time_days)
            .unwrap_or(self.config.default_lead_time_days);

        let raw_start = net.due_date - Duration::days(lead_time_days as i64);
        let (start_date, past_due) = if raw_start < run_date {
            // 起算日已過：夾至運行日並標記風險
            (run_date, true)
        } else {
            (raw_start, false)
        };

        // 主來源取第一筆需求（最早進入展開的單據）
        let source = net
            .sources
            .first()
            .map(|s| s.demand)
            .unwrap_or(fabplan_core::SourceRef::Adjustment);

        let pegging = PeggingCalculator::allocate(net.net_requirement, &net.sources);

        tracing::debug!(
            "生成計劃訂單: {} {:?} × {}，需求日 {}，開始日 {}{}",
            net.product_sku,
            order_type,
            net.net_requirement,
            net.due_date,
            start_date,
            if past_due { "（逾期風險）" } else { "" }
        );

        PlannedOrder::new(
            order_type,
            net.product_sku.clone(),
            net.net_requirement,
            net.due_date,
            start_date,
            source,
            run_id,
        )
        .with_past_due(past_due)
        .with_pegging(pegging)
    }
}
