//! 產品主檔模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 採購類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcurementType {
    /// 採購
    Buy,
    /// 自製（列印/組裝）
    Make,
}

/// 計量單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOfMeasure {
    /// 個
    Each,
    /// 克（線材以克計量）
    Gram,
    /// 公斤
    Kilogram,
    /// 公尺
    Meter,
    /// 毫升
    Milliliter,
}

/// 產品主檔
///
/// 產品是 BOM 圖的節點，也是庫存記錄的主體。
/// 以 SKU 作為唯一識別，建立後不會被刪除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// SKU（唯一識別）
    pub sku: String,

    /// 品名
    pub name: String,

    /// 計量單位
    pub unit_of_measure: UnitOfMeasure,

    /// 採購類型
    pub procurement_type: ProcurementType,

    /// 提前期（天）
    pub lead_time_days: u32,

    /// 安全庫存
    pub safety_stock: Decimal,

    /// 再訂購點
    pub reorder_point: Decimal,
}

impl Product {
    /// 創建新的產品
    pub fn new(sku: impl Into<String>, name: impl Into<String>, procurement_type: ProcurementType) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            unit_of_measure: UnitOfMeasure::Each,
            procurement_type,
            lead_time_days: 0,
            safety_stock: Decimal::ZERO,
            reorder_point: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置計量單位
    pub fn with_unit_of_measure(mut self, uom: UnitOfMeasure) -> Self {
        self.unit_of_measure = uom;
        self
    }

    /// 建構器模式：設置提前期
    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, qty: Decimal) -> Self {
        self.safety_stock = qty;
        self
    }

    /// 建構器模式：設置再訂購點
    pub fn with_reorder_point(mut self, qty: Decimal) -> Self {
        self.reorder_point = qty;
        self
    }

    /// 檢查是否為採購件
    pub fn is_buy(&self) -> bool {
        self.procurement_type == ProcurementType::Buy
    }

    /// 檢查是否為自製件
    pub fn is_make(&self) -> bool {
        self.procurement_type == ProcurementType::Make
    }
}
