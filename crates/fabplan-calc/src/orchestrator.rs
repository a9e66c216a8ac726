//! MRP 運行編排器
//!
//! 頂層驅動：選取範圍內的需求單據，逐單展開並跨單彙總，
//! 對共享庫存池只軋一次差，重建非鎖定的計劃訂單，
//! 並留下一筆運行稽核記錄。
//!
//! 寫入只發生在最後一步（原子替換 + 完成運行），
//! 中途任何錯誤都不會留下半套計劃訂單。

use chrono::{Duration, NaiveDate, Utc};
use fabplan_core::{
    DemandLine, MrpRun, PlanError, PlanRepository, PlannedOrder, PlanningConfig, Result,
};
use uuid::Uuid;

use crate::{Explosion, ExplosionCalculator, NettingCalculator, OrderPlanner, PlanningResult};

/// 顯式運行範圍（指定單據，略過狀態/時界自動選取）
#[derive(Debug, Clone, Default)]
pub struct RunScope {
    /// 銷售訂單 ID
    pub sales_order_ids: Vec<Uuid>,

    /// 生產工單 ID
    pub production_order_ids: Vec<Uuid>,
}

/// 運行請求
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// 計劃時界（天），不給則用配置預設
    pub horizon_days: Option<u32>,

    /// 運行基準日，不給則用今天（測試可固定日期）
    pub run_date: Option<NaiveDate>,

    /// 顯式範圍
    pub scope: Option<RunScope>,
}

impl RunRequest {
    /// 建構器模式：設置計劃時界
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = Some(days);
        self
    }

    /// 建構器模式：設置運行基準日
    pub fn with_run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = Some(date);
        self
    }

    /// 建構器模式：設置顯式範圍
    pub fn with_scope(mut self, scope: RunScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// 最大可接受的計劃時界（天）
const MAX_HORIZON_DAYS: u32 = 3650;

/// MRP 運行編排器
pub struct MrpOrchestrator<R: PlanRepository> {
    repo: R,
    config: PlanningConfig,
}

impl<R: PlanRepository> MrpOrchestrator<R> {
    /// 創建新的編排器（配置顯式注入）
    pub fn new(repo: R, config: PlanningConfig) -> Self {
        Self { repo, config }
    }

    /// 獲取倉儲引用
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 執行一次 MRP 運行
    ///
    /// 無效輸入（時界、不存在的單據）在建立運行記錄之前拒絕；
    /// 運行中的錯誤把記錄標為 failed 並回傳錯誤，不留半套輸出。
    pub fn run(&self, request: RunRequest) -> Result<PlanningResult> {
        let horizon_days = request
            .horizon_days
            .unwrap_or(self.config.planning_horizon_days);
        if horizon_days == 0 || horizon_days > MAX_HORIZON_DAYS {
            return Err(PlanError::InvalidHorizon(horizon_days as i64));
        }

        let run_date = request
            .run_date
            .unwrap_or_else(|| Utc::now().date_naive());

        // 顯式範圍在開跑前驗證：未知單據直接拒絕，不建運行記錄
        let mut warnings = Vec::new();
        let demand_lines =
            self.select_demand(run_date, horizon_days, request.scope.as_ref(), &mut warnings)?;

        let mut run = MrpRun::new(run_date, horizon_days);
        self.repo.insert_run(&run)?;

        tracing::info!(
            "開始 MRP 運行 {}：基準日 {}，時界 {} 天，需求 {} 筆",
            run.id,
            run_date,
            horizon_days,
            demand_lines.len()
        );

        match self.execute(&mut run, &demand_lines, warnings) {
            Ok((planned_orders, warnings)) => {
                run.warnings = warnings.len() as u32;
                run.complete()?;
                self.repo.update_run(&run)?;

                tracing::info!(
                    "MRP 運行 {} 完成：{} 單據 / {} 物料 / {} 短缺 / {} 計劃訂單 / {} 警告",
                    run.id,
                    run.orders_processed,
                    run.components_analyzed,
                    run.shortages_found,
                    run.planned_orders_created,
                    run.warnings
                );

                Ok(PlanningResult {
                    run,
                    planned_orders,
                    warnings,
                })
            }
            Err(err) => {
                tracing::warn!("MRP 運行 {} 失敗：{}", run.id, err);
                // 失敗也要留下稽核足跡；更新失敗時以原錯誤為準
                if run.fail(err.to_string()).is_ok() {
                    let _ = self.repo.update_run(&run);
                }
                Err(err)
            }
        }
    }

    /// 取消運行中的 MRP（外部中止）
    pub fn cancel(&self, run_id: Uuid) -> Result<MrpRun> {
        let mut run = self
            .repo
            .run(run_id)?
            .ok_or(PlanError::OrderNotFound(run_id))?;
        run.cancel()?;
        self.repo.update_run(&run)?;
        tracing::info!("MRP 運行 {} 已取消", run_id);
        Ok(run)
    }

    /// 選取範圍內的需求行
    fn select_demand(
        &self,
        run_date: NaiveDate,
        horizon_days: u32,
        scope: Option<&RunScope>,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<DemandLine>> {
        let mut lines = Vec::new();

        match scope {
            Some(scope) => {
                // 顯式範圍：單據必須存在；狀態不合者以警告跳過
                for id in &scope.sales_order_ids {
                    let order = self
                        .repo
                        .sales_order(*id)?
                        .ok_or(PlanError::OrderNotFound(*id))?;
                    if order.is_mrp_relevant() {
                        lines.extend(order.demand_lines());
                    } else {
                        tracing::warn!("銷售訂單 {} 狀態不納入 MRP，跳過", id);
                        warnings.push(format!("銷售訂單 {id} 狀態不納入 MRP，已跳過"));
                    }
                }
                for id in &scope.production_order_ids {
                    let order = self
                        .repo
                        .production_order(*id)?
                        .ok_or(PlanError::OrderNotFound(*id))?;
                    if order.is_mrp_relevant() {
                        lines.push(order.demand_line());
                    } else {
                        tracing::warn!("生產工單 {} 狀態不納入 MRP，跳過", id);
                        warnings.push(format!("生產工單 {id} 狀態不納入 MRP，已跳過"));
                    }
                }
            }
            None => {
                for order in self.repo.open_sales_orders()? {
                    if !order.is_mrp_relevant() {
                        continue;
                    }
                    lines.extend(
                        order
                            .demand_lines()
                            .into_iter()
                            .filter(|line| line.within_horizon(run_date, horizon_days)),
                    );
                }
                for order in self.repo.open_production_orders()? {
                    if !order.is_mrp_relevant() {
                        continue;
                    }
                    let line = order.demand_line();
                    if line.within_horizon(run_date, horizon_days) {
                        lines.push(line);
                    }
                }
            }
        }

        Ok(lines)
    }

    /// 運行主體：展開 → 彙總 → 淨算 → 生單 → 原子替換
    fn execute(
        &self,
        run: &mut MrpRun,
        demand_lines: &[DemandLine],
        mut warnings: Vec<String>,
    ) -> Result<(Vec<PlannedOrder>, Vec<String>)> {
        tracing::debug!("Step 1: 載入 BOM 索引與產品主檔");
        let bom_index = self.repo.bom_index()?;
        let products = self.repo.products()?;

        tracing::debug!("Step 2: 逐單展開並跨單彙總");
        let calculator =
            ExplosionCalculator::new(&bom_index, &products, self.config.max_bom_depth);
        let mut total = Explosion::new();
        let mut processed_orders = std::collections::HashSet::new();

        for line in demand_lines {
            // 引用已刪除產品的單據：跳過並記警告，不拖垮整個運行
            if !products.contains_key(&line.product_sku)
                && bom_index.active_bom(&line.product_sku).is_none()
            {
                tracing::warn!(
                    "需求 {} 引用未知產品 {}，跳過",
                    line.source,
                    line.product_sku
                );
                warnings.push(format!(
                    "需求 {} 引用未知產品 {}，已跳過",
                    line.source, line.product_sku
                ));
                continue;
            }

            // 無交期的單據視為永遠在範圍內，以時界末日作為需求日
            let due_date = line.due_date.unwrap_or(
                run.run_date + Duration::days(run.planning_horizon_days as i64),
            );

            let explosion =
                calculator.explode(&line.product_sku, line.quantity, due_date, line.source)?;
            total.merge(explosion);

            if let Some(order_id) = line.source.order_id() {
                processed_orders.insert(order_id);
            }
        }

        warnings.extend(std::mem::take(&mut total.warnings));
        run.orders_processed = processed_orders.len() as u32;
        run.components_analyzed = total.len() as u32;

        tracing::debug!("Step 3: 淨需求計算（全域庫存池，每物料軋一次）");
        let skus: Vec<String> = total.iter().map(|r| r.product_sku.clone()).collect();
        let snapshot = self.repo.inventory_snapshot(&skus)?;
        let net_requirements = NettingCalculator::calculate(&total, &snapshot, &products);
        run.shortages_found = net_requirements
            .iter()
            .filter(|n| n.is_shortage())
            .count() as u32;

        tracing::debug!("Step 4: 生成計劃訂單");
        let planner = OrderPlanner::new(&products, &self.config);
        let planned_orders =
            planner.plan(&net_requirements, run.id, run.run_date, &mut warnings);
        run.planned_orders_created = planned_orders.len() as u32;

        tracing::debug!("Step 5: 原子替換上一代 planned 訂單");
        let deleted = self
            .repo
            .replace_planned_orders(run.id, planned_orders.clone())?;
        tracing::debug!("刪除上一代 planned 訂單 {} 筆", deleted);

        Ok((planned_orders, warnings))
    }
}
