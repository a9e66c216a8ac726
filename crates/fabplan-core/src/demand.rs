//! 需求單據模型
//!
//! 銷售訂單與生產工單是 MRP 的需求來源：
//! 狀態決定是否納入計算，交期成為計劃訂單的需求日期。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SourceRef;

/// 銷售訂單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderStatus {
    /// 待確認
    Pending,
    /// 已確認
    Confirmed,
    /// 生產中
    InProduction,
    /// 已出貨
    Shipped,
    /// 已送達
    Delivered,
    /// 已取消
    Cancelled,
}

/// 銷售訂單明細行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderLine {
    /// 產品 SKU
    pub product_sku: String,
    /// 訂購數量
    pub quantity: Decimal,
}

/// 銷售訂單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    /// 訂單ID
    pub id: Uuid,

    /// 狀態
    pub status: SalesOrderStatus,

    /// 交貨日期（無交期視為永遠在計劃範圍內）
    pub delivery_date: Option<NaiveDate>,

    /// 明細行
    pub lines: Vec<SalesOrderLine>,
}

impl SalesOrder {
    /// 創建新的銷售訂單
    pub fn new(status: SalesOrderStatus, delivery_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status,
            delivery_date,
            lines: Vec::new(),
        }
    }

    /// 建構器模式：添加明細行
    pub fn with_line(mut self, product_sku: impl Into<String>, quantity: Decimal) -> Self {
        self.lines.push(SalesOrderLine {
            product_sku: product_sku.into(),
            quantity,
        });
        self
    }

    /// 檢查是否納入 MRP 計算
    pub fn is_mrp_relevant(&self) -> bool {
        matches!(
            self.status,
            SalesOrderStatus::Confirmed | SalesOrderStatus::InProduction
        )
    }

    /// 展開為需求行
    pub fn demand_lines(&self) -> Vec<DemandLine> {
        self.lines
            .iter()
            .map(|line| DemandLine {
                product_sku: line.product_sku.clone(),
                quantity: line.quantity,
                due_date: self.delivery_date,
                source: SourceRef::SalesOrder(self.id),
            })
            .collect()
    }
}

/// 生產工單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionOrderStatus {
    /// 草稿
    Draft,
    /// 已下達
    Released,
    /// 進行中
    InProgress,
    /// 已完工
    Complete,
    /// 已取消
    Cancelled,
}

/// 生產工單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionOrder {
    /// 工單ID
    pub id: Uuid,

    /// 產品 SKU
    pub product_sku: String,

    /// 生產數量
    pub quantity: Decimal,

    /// 狀態
    pub status: ProductionOrderStatus,

    /// 到期日期
    pub due_date: Option<NaiveDate>,
}

impl ProductionOrder {
    /// 創建新的生產工單
    pub fn new(
        product_sku: impl Into<String>,
        quantity: Decimal,
        status: ProductionOrderStatus,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_sku: product_sku.into(),
            quantity,
            status,
            due_date,
        }
    }

    /// 檢查是否納入 MRP 計算
    pub fn is_mrp_relevant(&self) -> bool {
        matches!(
            self.status,
            ProductionOrderStatus::Released | ProductionOrderStatus::InProgress
        )
    }

    /// 展開為需求行
    pub fn demand_line(&self) -> DemandLine {
        DemandLine {
            product_sku: self.product_sku.clone(),
            quantity: self.quantity,
            due_date: self.due_date,
            source: SourceRef::ProductionOrder(self.id),
        }
    }
}

/// 需求行（MRP 計算的統一輸入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandLine {
    /// 產品 SKU
    pub product_sku: String,

    /// 需求數量
    pub quantity: Decimal,

    /// 需求日期
    pub due_date: Option<NaiveDate>,

    /// 來源單據
    pub source: SourceRef,
}

impl DemandLine {
    /// 檢查需求日期是否落在計劃時界內（無交期視為在範圍內）
    pub fn within_horizon(&self, run_date: NaiveDate, horizon_days: u32) -> bool {
        match self.due_date {
            Some(due) => due <= run_date + chrono::Duration::days(horizon_days as i64),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_order_relevance() {
        let confirmed = SalesOrder::new(SalesOrderStatus::Confirmed, None);
        let pending = SalesOrder::new(SalesOrderStatus::Pending, None);
        let shipped = SalesOrder::new(SalesOrderStatus::Shipped, None);

        assert!(confirmed.is_mrp_relevant());
        assert!(!pending.is_mrp_relevant());
        assert!(!shipped.is_mrp_relevant());
    }

    #[test]
    fn test_sales_order_demand_lines() {
        let due = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
        let order = SalesOrder::new(SalesOrderStatus::Confirmed, Some(due))
            .with_line("WIDGET-001", Decimal::from(10))
            .with_line("CASE-MINI", Decimal::from(5));

        let lines = order.demand_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_sku, "WIDGET-001");
        assert_eq!(lines[0].due_date, Some(due));
        assert_eq!(lines[0].source, SourceRef::SalesOrder(order.id));
    }

    #[test]
    fn test_production_order_relevance() {
        let released = ProductionOrder::new(
            "BRACKET-PA12",
            Decimal::from(50),
            ProductionOrderStatus::Released,
            None,
        );
        let draft = ProductionOrder::new(
            "BRACKET-PA12",
            Decimal::from(50),
            ProductionOrderStatus::Draft,
            None,
        );

        assert!(released.is_mrp_relevant());
        assert!(!draft.is_mrp_relevant());
    }

    #[test]
    fn test_within_horizon() {
        let run_date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let line = DemandLine {
            product_sku: "WIDGET-001".to_string(),
            quantity: Decimal::from(10),
            due_date: Some(NaiveDate::from_ymd_opt(2026, 9, 20).unwrap()),
            source: SourceRef::Forecast(Uuid::new_v4()),
        };

        assert!(line.within_horizon(run_date, 30));
        assert!(!line.within_horizon(run_date, 10));

        // 無交期：永遠在範圍內
        let undated = DemandLine {
            due_date: None,
            ..line
        };
        assert!(undated.within_horizon(run_date, 1));
    }
}
