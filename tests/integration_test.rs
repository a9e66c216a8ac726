//! 集成測試
//!
//! 端到端走完整條管線：建主檔與單據 → 運行 MRP → 驗證計劃訂單。

use chrono::NaiveDate;
use fabplan::*;
use rstest::rstest;
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 規格場景的標準資料：
/// Widget 的 BOM 是 2 個支架（損耗 10%）+ 1 個螺絲，
/// 支架為採購件、提前期 5 天。
fn widget_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .add_product(Product::new(
            "WIDGET-001",
            "打印小部件",
            ProcurementType::Make,
        ))
        .unwrap();
    store
        .add_product(
            Product::new("BRACKET-PA12", "尼龍支架", ProcurementType::Buy).with_lead_time_days(5),
        )
        .unwrap();
    store
        .add_product(Product::new("SCREW-M3", "M3 螺絲", ProcurementType::Buy))
        .unwrap();
    store
        .add_bom(
            Bom::new("WIDGET-001", 1)
                .with_line(
                    BomLine::new("BRACKET-PA12", Decimal::from(2))
                        .with_scrap_factor(Decimal::from(10)),
                )
                .with_line(BomLine::new("SCREW-M3", Decimal::ONE)),
        )
        .unwrap();
    store
}

fn run_at(orchestrator: &MrpOrchestrator<MemoryStore>, run_date: NaiveDate) -> PlanningResult {
    orchestrator
        .run(
            RunRequest::default()
                .with_horizon_days(30)
                .with_run_date(run_date),
        )
        .unwrap()
}

#[test]
fn test_widget_shortage_scenario() {
    // 場景：10 個 Widget，9/21 交貨，支架無庫存
    // 支架毛需求 = 10 × 2 × 1.10 = 22，淨需求 22，
    // 採購建議 22 個，需求日 = 交期，開始日 = 需求日 − 5 天

    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    assert_eq!(result.run.status, MrpRunStatus::Completed);
    assert_eq!(result.run.orders_processed, 1);
    // 支架 + 螺絲（被需求的 Widget 本身不是子件需求）
    assert_eq!(result.run.components_analyzed, 2);

    let bracket = result
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "BRACKET-PA12")
        .unwrap();
    assert_eq!(bracket.quantity, Decimal::from(22));
    assert_eq!(bracket.order_type, PlannedOrderType::Purchase);
    assert_eq!(bracket.due_date, date(2026, 9, 21));
    assert_eq!(bracket.start_date, date(2026, 9, 16));
    assert!(!bracket.past_due);

    // 螺絲毛需求 10，無庫存 → 採購 10
    let screws = result
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "SCREW-M3")
        .unwrap();
    assert_eq!(screws.quantity, Decimal::from(10));

    // 被需求的產品自身不再生單：需求單據就是它的供給
    assert!(result
        .planned_orders
        .iter()
        .all(|o| o.product_sku != "WIDGET-001"));
}

#[rstest]
#[case(10, 22)]
#[case(100, 220)]
#[case(5, 11)]
fn test_scrap_arithmetic_end_to_end(#[case] demand: i64, #[case] expected_brackets: i64) {
    // 損耗放大精確成立：需求 × 2 × 1.10，無浮點飄移
    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(demand)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    let bracket = result
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "BRACKET-PA12")
        .unwrap();
    assert_eq!(bracket.quantity, Decimal::from(expected_brackets));
}

#[test]
fn test_widget_covered_by_inventory() {
    // 同樣的需求，但支架現有 25、未分配：
    // 淨需求 = max(0, 22 − 25) = 0 → 不生支架訂單

    let store = widget_store();
    store
        .set_inventory(Inventory::new("BRACKET-PA12", Decimal::from(25)))
        .unwrap();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    assert!(result
        .planned_orders
        .iter()
        .all(|o| o.product_sku != "BRACKET-PA12"));
    // 短缺只剩螺絲
    assert_eq!(result.run.shortages_found, 1);
}

#[test]
fn test_multi_level_time_phasing() {
    // 三層 BOM：
    //   PRINTER-KIT（自製，提前期 3）
    //     └── FRAME-ASSY ×1（自製，提前期 2）
    //         └── ROD-8MM ×4（採購，提前期 7）
    // 子件需求日逐層前移：FRAME 需求日 = 交期 − 3，ROD 需求日 = 交期 − 3 − 2

    let store = MemoryStore::new();
    store
        .add_product(
            Product::new("PRINTER-KIT", "列印機套件", ProcurementType::Make)
                .with_lead_time_days(3),
        )
        .unwrap();
    store
        .add_product(
            Product::new("FRAME-ASSY", "框架組件", ProcurementType::Make).with_lead_time_days(2),
        )
        .unwrap();
    store
        .add_product(
            Product::new("ROD-8MM", "8mm 光軸", ProcurementType::Buy).with_lead_time_days(7),
        )
        .unwrap();
    store
        .add_bom(Bom::new("PRINTER-KIT", 1).with_line(BomLine::new("FRAME-ASSY", Decimal::ONE)))
        .unwrap();
    store
        .add_bom(Bom::new("FRAME-ASSY", 1).with_line(BomLine::new("ROD-8MM", Decimal::from(4))))
        .unwrap();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 30)))
                .with_line("PRINTER-KIT", Decimal::from(5)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    let frame = result
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "FRAME-ASSY")
        .unwrap();
    assert_eq!(frame.quantity, Decimal::from(5));
    assert_eq!(frame.due_date, date(2026, 9, 27));
    assert_eq!(frame.start_date, date(2026, 9, 25));

    let rods = result
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "ROD-8MM")
        .unwrap();
    assert_eq!(rods.quantity, Decimal::from(20));
    assert_eq!(rods.due_date, date(2026, 9, 25));
    assert_eq!(rods.start_date, date(2026, 9, 18));
}

#[test]
fn test_past_due_start_clamped() {
    // 提前期 30 天但交期只剩 10 天：開始日夾至運行日並標記逾期
    let store = MemoryStore::new();
    store
        .add_product(
            Product::new("NOZZLE-04", "0.4mm 噴嘴", ProcurementType::Buy).with_lead_time_days(30),
        )
        .unwrap();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 11)))
                .with_line("NOZZLE-04", Decimal::from(10)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    let nozzle = &result.planned_orders[0];
    assert_eq!(nozzle.start_date, date(2026, 9, 1));
    assert!(nozzle.past_due);
}

#[test]
fn test_idempotent_regeneration() {
    // 連續運行兩次、資料不變：第二次重建出逐筆等價的一組訂單
    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();
    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());

    let first = run_at(&orchestrator, date(2026, 9, 1));
    let second = run_at(&orchestrator, date(2026, 9, 1));

    assert_eq!(first.planned_orders.len(), second.planned_orders.len());

    let persisted = orchestrator.repository().planned_orders().unwrap();
    assert_eq!(persisted.len(), second.planned_orders.len());

    for order in &second.planned_orders {
        let prior = first
            .planned_orders
            .iter()
            .find(|o| o.product_sku == order.product_sku)
            .unwrap();
        assert_eq!(prior.quantity, order.quantity);
        assert_eq!(prior.due_date, order.due_date);
        assert_eq!(prior.start_date, order.start_date);
    }
}

#[test]
fn test_firmed_order_immune_to_regeneration() {
    // 使用者確認過的計劃訂單，後續運行不得刪除或修改
    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();
    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());

    let first = run_at(&orchestrator, date(2026, 9, 1));
    let bracket = first
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "BRACKET-PA12")
        .unwrap();
    let firmed_id = bracket.id;
    let firmed_qty = bracket.quantity;
    orchestrator
        .repository()
        .firm_planned_order(firmed_id)
        .unwrap();

    // 庫存變化讓短缺重算出不同數字，firmed 單仍原樣留存
    orchestrator
        .repository()
        .set_inventory(Inventory::new("BRACKET-PA12", Decimal::from(100)))
        .unwrap();
    run_at(&orchestrator, date(2026, 9, 1));

    let persisted = orchestrator.repository().planned_orders().unwrap();
    let survivor = persisted.iter().find(|o| o.id == firmed_id).unwrap();
    assert_eq!(survivor.status, PlannedOrderStatus::Firmed);
    assert_eq!(survivor.quantity, firmed_qty);
}

#[test]
fn test_production_order_as_demand() {
    // 生產工單也是需求來源，pegging 指回工單；
    // 工單本身即為 Widget 的供給，不得再為 Widget 生單
    let store = widget_store();
    let po_id = store
        .add_production_order(ProductionOrder::new(
            "WIDGET-001",
            Decimal::from(20),
            ProductionOrderStatus::Released,
            Some(date(2026, 9, 15)),
        ))
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    assert!(result
        .planned_orders
        .iter()
        .all(|o| o.product_sku != "WIDGET-001"));

    let bracket = result
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "BRACKET-PA12")
        .unwrap();
    // 20 × 2 × 1.10 = 44
    assert_eq!(bracket.quantity, Decimal::from(44));
    assert_eq!(bracket.source, SourceRef::ProductionOrder(po_id));
    assert!(bracket
        .pegging
        .iter()
        .all(|p| p.demand == SourceRef::ProductionOrder(po_id)));
}

#[test]
fn test_horizon_excludes_far_orders() {
    // 交期超出時界的訂單不納入本次運行
    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 12, 24)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    assert_eq!(result.run.orders_processed, 0);
    assert!(result.planned_orders.is_empty());
}

#[test]
fn test_pending_orders_not_demand() {
    // 待確認/已出貨的訂單不是需求
    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Pending, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Shipped, Some(date(2026, 9, 10)))
                .with_line("WIDGET-001", Decimal::from(4)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = run_at(&orchestrator, date(2026, 9, 1));

    assert!(result.planned_orders.is_empty());
}

#[test]
fn test_fulfillment_ledger_feeds_next_run() {
    // 履行流程過帳收貨後，下一次運行看到新的可用量
    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();
    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());

    let before = run_at(&orchestrator, date(2026, 9, 1));
    assert!(before
        .planned_orders
        .iter()
        .any(|o| o.product_sku == "BRACKET-PA12"));

    // 收貨 30 個支架（MRP 本身永不過帳，寫入來自履行面）
    orchestrator
        .repository()
        .post_transaction(InventoryTransaction::new(
            "BRACKET-PA12",
            TransactionType::Receipt,
            Decimal::from(30),
            SourceRef::Adjustment,
        ))
        .unwrap();

    let after = run_at(&orchestrator, date(2026, 9, 2));
    assert!(after
        .planned_orders
        .iter()
        .all(|o| o.product_sku != "BRACKET-PA12"));
}

#[test]
fn test_explicit_scope_run() {
    // 顯式指定單據：只算指定的那張，時界過濾不適用
    let store = widget_store();
    let in_scope = store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 12, 24)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 10)))
                .with_line("WIDGET-001", Decimal::from(99)),
        )
        .unwrap();

    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = orchestrator
        .run(
            RunRequest::default()
                .with_horizon_days(30)
                .with_run_date(date(2026, 9, 1))
                .with_scope(RunScope {
                    sales_order_ids: vec![in_scope],
                    production_order_ids: vec![],
                }),
        )
        .unwrap();

    // 只有指定的那張單：支架需求 10 × 2 × 1.10 = 22，不含另一張的 99
    assert_eq!(result.run.orders_processed, 1);
    let bracket = result
        .planned_orders
        .iter()
        .find(|o| o.product_sku == "BRACKET-PA12")
        .unwrap();
    assert_eq!(bracket.quantity, Decimal::from(22));
    assert_eq!(bracket.source, SourceRef::SalesOrder(in_scope));
}

#[test]
fn test_released_order_records_conversion() {
    // 下達後的計劃訂單保留真實單據連結，後續運行不可動
    let store = widget_store();
    store
        .add_sales_order(
            SalesOrder::new(SalesOrderStatus::Confirmed, Some(date(2026, 9, 21)))
                .with_line("WIDGET-001", Decimal::from(10)),
        )
        .unwrap();
    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());

    let first = run_at(&orchestrator, date(2026, 9, 1));
    let released_id = first.planned_orders[0].id;
    let real_po = Uuid::new_v4();
    orchestrator
        .repository()
        .release_planned_order(released_id, real_po)
        .unwrap();

    run_at(&orchestrator, date(2026, 9, 1));

    let persisted = orchestrator.repository().planned_orders().unwrap();
    let survivor = persisted.iter().find(|o| o.id == released_id).unwrap();
    assert_eq!(survivor.status, PlannedOrderStatus::Released);
    assert_eq!(survivor.converted_order_id, Some(real_po));
}
