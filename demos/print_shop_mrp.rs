//! 3D 列印工場 MRP 完整範例
//!
//! 展示從主檔、訂單到計劃訂單的完整計劃流程

use chrono::NaiveDate;
use fabplan::*;
use rust_decimal::Decimal;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("===== Print Shop MRP Example =====\n");

    // 步驟 1: 建立產品主檔
    println!("[1] Create Product Master");
    let store = MemoryStore::new();
    store.add_product(Product::new(
        "WIDGET-001",
        "打印小部件",
        ProcurementType::Make,
    ))?;
    store.add_product(
        Product::new("BRACKET-PA12", "尼龍支架", ProcurementType::Buy)
            .with_lead_time_days(5)
            .with_safety_stock(Decimal::from(4)),
    )?;
    store.add_product(Product::new("SCREW-M3", "M3 螺絲", ProcurementType::Buy))?;
    store.add_product(
        Product::new("PLA-RED-1KG", "紅色 PLA 線材", ProcurementType::Buy)
            .with_lead_time_days(7)
            .with_unit_of_measure(UnitOfMeasure::Gram),
    )?;
    println!("    WIDGET-001: Make");
    println!("    BRACKET-PA12: Buy, Lead Time 5 days, Safety Stock 4");
    println!("    SCREW-M3: Buy");
    println!("    PLA-RED-1KG: Buy, Lead Time 7 days\n");

    // 步驟 2: 建立 BOM
    println!("[2] Create BOM");
    store.add_bom(
        Bom::new("WIDGET-001", 1)
            .with_line(
                BomLine::new("BRACKET-PA12", Decimal::from(2))
                    .with_scrap_factor(Decimal::from(10)),
            )
            .with_line(BomLine::new("SCREW-M3", Decimal::ONE))
            .with_line(
                BomLine::new("PLA-RED-1KG", Decimal::from(35))
                    .with_scrap_factor(Decimal::from(5)),
            ),
    )?;
    println!("    WIDGET-001 = 2× BRACKET-PA12 (10% scrap)");
    println!("               + 1× SCREW-M3");
    println!("               + 35g PLA-RED-1KG (5% scrap)\n");

    // 步驟 3: 期初庫存（過帳收貨交易）
    println!("[3] Post Opening Inventory");
    store.post_transaction(InventoryTransaction::new(
        "SCREW-M3",
        TransactionType::Receipt,
        Decimal::from(500),
        SourceRef::Adjustment,
    ))?;
    store.post_transaction(InventoryTransaction::new(
        "PLA-RED-1KG",
        TransactionType::Receipt,
        Decimal::from(200),
        SourceRef::Adjustment,
    ))?;
    println!("    SCREW-M3: Receipt 500");
    println!("    PLA-RED-1KG: Receipt 200g\n");

    // 步驟 4: 建立需求單據
    println!("[4] Create Demand Orders");
    store.add_sales_order(
        SalesOrder::new(
            SalesOrderStatus::Confirmed,
            NaiveDate::from_ymd_opt(2026, 9, 21),
        )
        .with_line("WIDGET-001", Decimal::from(10)),
    )?;
    store.add_production_order(ProductionOrder::new(
        "WIDGET-001",
        Decimal::from(5),
        ProductionOrderStatus::Released,
        NaiveDate::from_ymd_opt(2026, 9, 25),
    ))?;
    println!("    SO: 10 widgets due 2026-09-21");
    println!("    PO: 5 widgets due 2026-09-25\n");

    // 步驟 5: 執行 MRP 運行
    println!("[5] Execute MRP Run");
    let orchestrator = MrpOrchestrator::new(store, PlanningConfig::default());
    let result = orchestrator.run(
        RunRequest::default()
            .with_horizon_days(30)
            .with_run_date(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
    )?;

    println!(
        "    Run {}: {} orders / {} components / {} shortages\n",
        result.run.id,
        result.run.orders_processed,
        result.run.components_analyzed,
        result.run.shortages_found
    );

    // 步驟 6: 顯示計劃訂單
    println!("[6] Planned Orders");
    for order in &result.planned_orders {
        println!(
            "    {:?} {} | Qty: {} | Start: {} | Due: {}{}",
            order.order_type,
            order.product_sku,
            order.quantity,
            order.start_date,
            order.due_date,
            if order.past_due { " | PAST DUE" } else { "" }
        );
        for peg in &order.pegging {
            println!("      pegged to {} for {}", peg.demand, peg.quantity);
        }
    }
    println!();

    if !result.warnings.is_empty() {
        println!("    Warnings:");
        for warning in &result.warnings {
            println!("      - {warning}");
        }
        println!();
    }

    println!("===== MRP Run Complete =====\n");

    Ok(())
}
