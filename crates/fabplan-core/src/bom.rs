//! BOM（物料清單）模型
//!
//! BOM 是靜態的製造配方：父產品 → 子件用量、損耗率與消耗階段。
//! 對展開計算而言是唯讀輸入。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{PlanError, Result};

/// 消耗階段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeStage {
    /// 生產時消耗（線材、嵌件）
    Production,
    /// 出貨時消耗（包材）
    Shipping,
}

/// BOM 明細行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    /// 子件 SKU
    pub component_sku: String,

    /// 每單位父件用量
    pub quantity: Decimal,

    /// 損耗率（百分比 0-100，放大需求量）
    pub scrap_factor: Decimal,

    /// 消耗階段
    pub consume_stage: ConsumeStage,
}

impl BomLine {
    /// 創建新的 BOM 明細行
    pub fn new(component_sku: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            component_sku: component_sku.into(),
            quantity,
            scrap_factor: Decimal::ZERO,
            consume_stage: ConsumeStage::Production,
        }
    }

    /// 建構器模式：設置損耗率（百分比）
    pub fn with_scrap_factor(mut self, scrap_factor: Decimal) -> Self {
        self.scrap_factor = scrap_factor;
        self
    }

    /// 建構器模式：設置消耗階段
    pub fn with_consume_stage(mut self, stage: ConsumeStage) -> Self {
        self.consume_stage = stage;
        self
    }

    /// 驗證明細行
    ///
    /// 不變量：用量 > 0、損耗率 0-100、子件不得等於父件
    pub fn validate(&self, parent_sku: &str) -> Result<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(PlanError::InvalidQuantity(format!(
                "BOM 明細 {} 的用量必須大於 0",
                self.component_sku
            )));
        }
        if self.scrap_factor < Decimal::ZERO || self.scrap_factor > Decimal::from(100) {
            return Err(PlanError::InvalidQuantity(format!(
                "BOM 明細 {} 的損耗率必須在 0-100 之間",
                self.component_sku
            )));
        }
        if self.component_sku == parent_sku {
            return Err(PlanError::BomCycle {
                product: parent_sku.to_string(),
                path: vec![parent_sku.to_string(), self.component_sku.clone()],
            });
        }
        Ok(())
    }

    /// 計算展開用量 = 父件需求 × 用量 × (1 + 損耗率/100)
    pub fn extended_quantity(&self, parent_requirement: Decimal) -> Decimal {
        parent_requirement
            * self.quantity
            * (Decimal::ONE + self.scrap_factor / Decimal::from(100))
    }
}

/// BOM（一個產品版本一張）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bom {
    /// BOM ID
    pub id: Uuid,

    /// 所屬產品 SKU
    pub product_sku: String,

    /// 版本
    pub version: u32,

    /// 是否啟用
    pub active: bool,

    /// 明細行（隨 BOM 一起存在，BOM 刪除時一併刪除）
    pub lines: Vec<BomLine>,
}

impl Bom {
    /// 創建新的 BOM
    pub fn new(product_sku: impl Into<String>, version: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_sku: product_sku.into(),
            version,
            active: true,
            lines: Vec::new(),
        }
    }

    /// 建構器模式：添加明細行
    pub fn with_line(mut self, line: BomLine) -> Self {
        self.lines.push(line);
        self
    }

    /// 建構器模式：設置啟用狀態
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// 驗證整張 BOM
    pub fn validate(&self) -> Result<()> {
        for line in &self.lines {
            line.validate(&self.product_sku)?;
        }
        Ok(())
    }
}

/// BOM 索引（展開計算的唯讀輸入）
///
/// 每個產品只保留一張啟用 BOM；同一產品存在多張啟用 BOM 時，
/// 確定性地取版本最高者。
#[derive(Debug, Clone, Default)]
pub struct BomIndex {
    boms: HashMap<String, Bom>,
}

impl BomIndex {
    /// 創建空的索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 BOM 列表建立索引（過濾未啟用，版本高者優先）
    pub fn build(boms: impl IntoIterator<Item = Bom>) -> Result<Self> {
        let mut index = Self::new();
        for bom in boms {
            index.insert(bom)?;
        }
        Ok(index)
    }

    /// 插入一張 BOM（驗證後）
    pub fn insert(&mut self, bom: Bom) -> Result<()> {
        bom.validate()?;
        if !bom.active {
            return Ok(());
        }
        match self.boms.get(&bom.product_sku) {
            Some(existing) if existing.version >= bom.version => {}
            _ => {
                self.boms.insert(bom.product_sku.clone(), bom);
            }
        }
        Ok(())
    }

    /// 查找產品的啟用 BOM（無 BOM 即為葉節點/採購件）
    pub fn active_bom(&self, product_sku: &str) -> Option<&Bom> {
        self.boms.get(product_sku)
    }

    /// 索引中的 BOM 數量
    pub fn len(&self) -> usize {
        self.boms.len()
    }

    /// 檢查索引是否為空
    pub fn is_empty(&self) -> bool {
        self.boms.is_empty()
    }
}
