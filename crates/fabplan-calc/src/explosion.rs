//! BOM 展開
//!
//! 深度優先的純遞迴折疊：給定頂層需求，沿 BOM 圖展開全部
//! 子件毛需求，同一子件經多條路徑到達時以加法合併。
//! 無副作用，同樣輸入必得同樣結果。

use chrono::{Duration, NaiveDate};
use fabplan_core::{BomIndex, PeggingRecord, PlanError, Product, Result, SourceRef};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// 單一物料的彙總需求
#[derive(Debug, Clone)]
pub struct ComponentRequirement {
    /// 產品 SKU
    pub product_sku: String,

    /// 毛需求（跨路徑、跨單據加總）
    pub quantity: Decimal,

    /// 需求日期（各路徑中最早者）
    pub due_date: NaiveDate,

    /// 需求來源明細（pegging 素材）
    pub sources: Vec<PeggingRecord>,
}

/// 展開結果（按 SKU 排序，保證確定性疊代順序）
#[derive(Debug, Clone, Default)]
pub struct Explosion {
    requirements: BTreeMap<String, ComponentRequirement>,

    /// 資料品質警告（缺主檔的物料等）
    pub warnings: Vec<String>,
}

impl Explosion {
    /// 創建空的展開結果
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一筆需求（同 SKU 以加法合併，需求日期取最早）
    pub fn add(
        &mut self,
        product_sku: &str,
        quantity: Decimal,
        due_date: NaiveDate,
        source: SourceRef,
        path: Vec<String>,
    ) {
        let record = PeggingRecord::new(source, quantity).with_path(path);
        self.requirements
            .entry(product_sku.to_string())
            .and_modify(|req| {
                req.quantity += quantity;
                req.due_date = req.due_date.min(due_date);
                req.sources.push(record.clone());
            })
            .or_insert_with(|| ComponentRequirement {
                product_sku: product_sku.to_string(),
                quantity,
                due_date,
                sources: vec![record],
            });
    }

    /// 合併另一份展開結果（跨單據彙總用）
    pub fn merge(&mut self, other: Explosion) {
        for (_, req) in other.requirements {
            for source in req.sources {
                // 逐筆來源重放，保持 pegging 明細完整
                self.requirements
                    .entry(req.product_sku.clone())
                    .and_modify(|existing| {
                        existing.quantity += source.quantity;
                        existing.due_date = existing.due_date.min(req.due_date);
                        existing.sources.push(source.clone());
                    })
                    .or_insert_with(|| ComponentRequirement {
                        product_sku: req.product_sku.clone(),
                        quantity: source.quantity,
                        due_date: req.due_date,
                        sources: vec![source],
                    });
            }
        }
        self.warnings.extend(other.warnings);
    }

    /// 查詢單一物料需求
    pub fn requirement(&self, product_sku: &str) -> Option<&ComponentRequirement> {
        self.requirements.get(product_sku)
    }

    /// 疊代全部需求（SKU 字典序）
    pub fn iter(&self) -> impl Iterator<Item = &ComponentRequirement> {
        self.requirements.values()
    }

    /// 物料數量
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// 檢查是否為空
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

/// BOM 展開計算器
pub struct ExplosionCalculator<'a> {
    index: &'a BomIndex,
    products: &'a HashMap<String, Product>,
    max_depth: u32,
}

impl<'a> ExplosionCalculator<'a> {
    /// 創建新的展開計算器
    pub fn new(
        index: &'a BomIndex,
        products: &'a HashMap<String, Product>,
        max_depth: u32,
    ) -> Self {
        Self {
            index,
            products,
            max_depth,
        }
    }

    /// 展開一筆頂層需求
    ///
    /// 結果是子件毛需求的映射：有 BOM 的產品只貢獻其子件——
    /// 需求單據本身就是該產品的供給；無 BOM 的葉件需求落在自身。
    /// 子件需求日期 = 父件需求日期 − 父件提前期（逐層前移）。
    pub fn explode(
        &self,
        product_sku: &str,
        quantity: Decimal,
        due_date: NaiveDate,
        source: SourceRef,
    ) -> Result<Explosion> {
        if quantity <= Decimal::ZERO {
            return Err(PlanError::InvalidQuantity(format!(
                "展開數量必須大於 0: {product_sku}"
            )));
        }

        let mut result = Explosion::new();

        // 葉件（無 BOM）：需求落在產品自身
        if self.index.active_bom(product_sku).is_none() {
            result.add(
                product_sku,
                quantity,
                due_date,
                source,
                vec![product_sku.to_string()],
            );
        }

        let mut path = Vec::new();
        self.explode_level(
            product_sku,
            quantity,
            due_date,
            source,
            &mut path,
            0,
            &mut result,
        )?;

        tracing::debug!(
            "BOM 展開完成: {} × {} → {} 項物料",
            product_sku,
            quantity,
            result.len()
        );

        Ok(result)
    }

    /// 展開單一層級（遞迴）
    #[allow(clippy::too_many_arguments)]
    fn explode_level(
        &self,
        parent_sku: &str,
        parent_quantity: Decimal,
        parent_due: NaiveDate,
        source: SourceRef,
        path: &mut Vec<String>,
        depth: u32,
        result: &mut Explosion,
    ) -> Result<()> {
        let bom = match self.index.active_bom(parent_sku) {
            Some(bom) => bom,
            // 無 BOM 即為葉件/採購件，需求已在上一層累加
            None => return Ok(()),
        };

        // 循環檢測：產品在目前遞迴路徑上再次出現
        if path.iter().any(|p| p == parent_sku) {
            let mut cycle_path = path.clone();
            cycle_path.push(parent_sku.to_string());
            return Err(PlanError::BomCycle {
                product: parent_sku.to_string(),
                path: cycle_path,
            });
        }

        // 層數防禦：壞資料不應拖垮整個運行的堆疊
        if depth >= self.max_depth {
            return Err(PlanError::BomDepthExceeded {
                product: parent_sku.to_string(),
                max_depth: self.max_depth,
            });
        }

        path.push(parent_sku.to_string());

        // 時間前移：子件要在父件開始生產時到位
        let child_due = parent_due - Duration::days(self.lead_time_of(parent_sku, result) as i64);

        for line in &bom.lines {
            let line_requirement = line.extended_quantity(parent_quantity);

            let mut component_path = path.clone();
            component_path.push(line.component_sku.clone());

            result.add(
                &line.component_sku,
                line_requirement,
                child_due,
                source,
                component_path,
            );

            self.explode_level(
                &line.component_sku,
                line_requirement,
                child_due,
                source,
                path,
                depth + 1,
                result,
            )?;
        }

        path.pop();
        Ok(())
    }

    /// 讀取產品提前期；缺主檔時以 0 代入並記錄警告
    fn lead_time_of(&self, sku: &str, result: &mut Explosion) -> u32 {
        match self.products.get(sku) {
            Some(product) => product.lead_time_days,
            None => {
                tracing::warn!("產品 {} 缺主檔，提前期以 0 代入", sku);
                result
                    .warnings
                    .push(format!("產品 {sku} 缺主檔，提前期以 0 代入"));
                0
            }
        }
    }
}
