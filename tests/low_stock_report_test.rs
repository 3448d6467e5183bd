use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;

use stockwatch_api::{
    db::{self, DbConfig, DbPool},
    entities::{
        inventory, product, product_type, sales_order, sales_order_item, supplier,
        supplier_product, warehouse,
    },
    errors::ServiceError,
    services::low_stock::{LowStockAlertService, ReportParams},
};

const COMPANY_ID: i64 = 1;
const OTHER_COMPANY_ID: i64 = 2;

/// Fresh single-connection in-memory database with the schema applied.
async fn test_db() -> DbPool {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&config)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

async fn create_product_type(db: &DbPool, name: &str, threshold: Option<i32>) -> product_type::Model {
    product_type::ActiveModel {
        name: Set(name.to_string()),
        default_low_stock_threshold: Set(threshold),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert product type")
}

async fn create_product(
    db: &DbPool,
    name: &str,
    sku: &str,
    product_type_id: Option<i64>,
) -> product::Model {
    product::ActiveModel {
        name: Set(name.to_string()),
        sku: Set(sku.to_string()),
        product_type_id: Set(product_type_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert product")
}

async fn create_warehouse(db: &DbPool, name: &str, company_id: i64) -> warehouse::Model {
    warehouse::ActiveModel {
        name: Set(name.to_string()),
        company_id: Set(company_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert warehouse")
}

async fn create_inventory(
    db: &DbPool,
    product_id: i64,
    warehouse_id: i64,
    quantity: i32,
    reorder_point: Option<i32>,
) -> inventory::Model {
    inventory::ActiveModel {
        product_id: Set(product_id),
        warehouse_id: Set(warehouse_id),
        quantity: Set(quantity),
        reorder_point: Set(reorder_point),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert inventory record")
}

/// One order with a single line, created `days_ago` days in the past.
async fn create_sale(db: &DbPool, company_id: i64, product_id: i64, quantity: i32, days_ago: i64) {
    let order = sales_order::ActiveModel {
        company_id: Set(company_id),
        created_at: Set(Utc::now() - Duration::days(days_ago)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert sales order");

    sales_order_item::ActiveModel {
        sales_order_id: Set(order.id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert sales order item");
}

async fn create_supplier(db: &DbPool, name: &str, email: &str) -> supplier::Model {
    supplier::ActiveModel {
        name: Set(name.to_string()),
        contact_email: Set(email.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert supplier")
}

async fn link_supplier(
    db: &DbPool,
    supplier_id: i64,
    product_id: i64,
    is_primary: bool,
    lead_time_days: Option<i32>,
) {
    supplier_product::ActiveModel {
        supplier_id: Set(supplier_id),
        product_id: Set(product_id),
        is_primary: Set(is_primary),
        lead_time_days: Set(lead_time_days),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert supplier product link");
}

#[tokio::test]
async fn full_report_for_a_depleted_product() {
    let pool = test_db().await;
    let db = &pool;

    let widgets = create_product_type(db, "Widgets", Some(10)).await;
    let product = create_product(db, "Widget", "WID-001", Some(widgets.id)).await;
    let warehouse = create_warehouse(db, "Main Warehouse", COMPANY_ID).await;
    create_inventory(db, product.id, warehouse.id, 5, None).await;
    create_sale(db, COMPANY_ID, product.id, 30, 10).await;

    let acme = create_supplier(db, "Acme", "orders@acme.example").await;
    let slowco = create_supplier(db, "Slowco", "sales@slowco.example").await;
    link_supplier(db, acme.id, product.id, true, Some(3)).await;
    link_supplier(db, slowco.id, product.id, false, Some(1)).await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    assert_eq!(report.total_alerts, 1);
    let alert = &report.alerts[0];
    assert_eq!(alert.product_name, "Widget");
    assert_eq!(alert.sku, "WID-001");
    assert_eq!(alert.warehouse_name, "Main Warehouse");
    assert_eq!(alert.current_stock, 5);
    assert_eq!(alert.threshold, 10);
    assert_eq!(alert.days_until_stockout, Some(5.00));
    // primary link wins even though the other supplier is faster
    assert_eq!(alert.supplier.id, Some(acme.id));
    assert_eq!(alert.supplier.name.as_deref(), Some("Acme"));
    assert_eq!(alert.supplier.contact_email.as_deref(), Some("orders@acme.example"));
}

#[tokio::test]
async fn explicit_reorder_point_overrides_type_default() {
    let pool = test_db().await;
    let db = &pool;

    let widgets = create_product_type(db, "Widgets", Some(10)).await;
    let product = create_product(db, "Widget", "WID-001", Some(widgets.id)).await;
    let warehouse = create_warehouse(db, "Main Warehouse", COMPANY_ID).await;
    // stock 5 is below the type default of 10 but not below the explicit 3
    create_inventory(db, product.id, warehouse.id, 5, Some(3)).await;
    create_sale(db, COMPANY_ID, product.id, 12, 5).await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    assert_eq!(report.total_alerts, 0);
}

#[tokio::test]
async fn rows_of_other_companies_are_invisible() {
    let pool = test_db().await;
    let db = &pool;

    let product = create_product(db, "Widget", "WID-001", None).await;
    let theirs = create_warehouse(db, "Their Warehouse", OTHER_COMPANY_ID).await;
    create_inventory(db, product.id, theirs.id, 1, Some(10)).await;
    // the other company's demand is real, but it is not ours
    create_sale(db, OTHER_COMPANY_ID, product.id, 50, 2).await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    assert_eq!(report.total_alerts, 0);
}

#[tokio::test]
async fn foreign_demand_does_not_activate_own_inventory() {
    let pool = test_db().await;
    let db = &pool;

    let product = create_product(db, "Widget", "WID-001", None).await;
    let ours = create_warehouse(db, "Main Warehouse", COMPANY_ID).await;
    create_inventory(db, product.id, ours.id, 2, Some(10)).await;
    // only the other company sold the product recently
    create_sale(db, OTHER_COMPANY_ID, product.id, 50, 2).await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    assert_eq!(report.total_alerts, 0);
}

#[tokio::test]
async fn sales_outside_the_window_are_ignored() {
    let pool = test_db().await;
    let db = &pool;

    let product = create_product(db, "Widget", "WID-001", None).await;
    let warehouse = create_warehouse(db, "Main Warehouse", COMPANY_ID).await;
    create_inventory(db, product.id, warehouse.id, 2, Some(10)).await;
    create_sale(db, COMPANY_ID, product.id, 40, 60).await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    assert_eq!(report.total_alerts, 0);
}

#[tokio::test]
async fn default_window_applies_when_absent() {
    let pool = test_db().await;
    let db = &pool;

    let product = create_product(db, "Widget", "WID-001", None).await;
    let warehouse = create_warehouse(db, "Main Warehouse", COMPANY_ID).await;
    create_inventory(db, product.id, warehouse.id, 2, Some(10)).await;
    // inside the default 30-day window
    create_sale(db, COMPANY_ID, product.id, 15, 20).await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: None,
        })
        .await
        .expect("Failed to generate report");

    assert_eq!(report.total_alerts, 1);
    // 15 sold over 30 days -> 0.5/day; 2 / 0.5 = 4 days
    assert_eq!(report.alerts[0].days_until_stockout, Some(4.00));
}

#[tokio::test]
async fn out_of_range_window_is_rejected_before_touching_data() {
    let pool = test_db().await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let err = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(400),
        })
        .await
        .expect_err("Expected invalid input error");

    assert_matches!(err, ServiceError::InvalidInput(_));
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn alerts_are_ordered_by_deficit_then_name() {
    let pool = test_db().await;
    let db = &pool;

    let warehouse = create_warehouse(db, "Main Warehouse", COMPANY_ID).await;

    let anvil = create_product(db, "Anvil", "ANV-001", None).await;
    let bolt = create_product(db, "Bolt", "BLT-001", None).await;
    let zip = create_product(db, "Zip", "ZIP-001", None).await;

    // deficits: Anvil 5, Bolt 8, Zip 8
    create_inventory(db, anvil.id, warehouse.id, 5, Some(10)).await;
    create_inventory(db, bolt.id, warehouse.id, 2, Some(10)).await;
    create_inventory(db, zip.id, warehouse.id, 2, Some(10)).await;

    for product_id in [anvil.id, bolt.id, zip.id] {
        create_sale(db, COMPANY_ID, product_id, 9, 3).await;
    }

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    let names: Vec<&str> = report
        .alerts
        .iter()
        .map(|a| a.product_name.as_str())
        .collect();
    assert_eq!(names, vec!["Bolt", "Zip", "Anvil"]);
}

#[tokio::test]
async fn unlinked_product_serializes_with_null_supplier_fields() {
    let pool = test_db().await;
    let db = &pool;

    let product = create_product(db, "Widget", "WID-001", None).await;
    let warehouse = create_warehouse(db, "Main Warehouse", COMPANY_ID).await;
    create_inventory(db, product.id, warehouse.id, 2, Some(10)).await;
    create_sale(db, COMPANY_ID, product.id, 15, 3).await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    let json = serde_json::to_value(&report).expect("Failed to serialize report");
    let supplier = &json["alerts"][0]["supplier"];
    // the key is present with null fields, never omitted
    assert!(supplier.is_object());
    assert!(supplier["id"].is_null());
    assert!(supplier["name"].is_null());
    assert!(supplier["contact_email"].is_null());
}

#[tokio::test]
async fn empty_company_yields_an_empty_report() {
    let pool = test_db().await;

    let service = LowStockAlertService::new(Arc::new(pool));
    let report = service
        .generate(ReportParams {
            company_id: COMPANY_ID,
            days_window: Some(30),
        })
        .await
        .expect("Failed to generate report");

    assert_eq!(report.total_alerts, 0);
    assert!(report.alerts.is_empty());
}
