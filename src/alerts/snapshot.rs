//! Snapshot types consumed by the alert pipeline.
//!
//! A snapshot is the company-scoped, window-scoped slice of inventory,
//! sales and supplier data the pipeline needs. The structs derive
//! `FromQueryResult` so the query layer can hydrate them directly, but
//! nothing here depends on a live connection; tests build them from
//! literals.

use sea_orm::FromQueryResult;

/// One inventory record joined with its warehouse, product and the
/// product type's default threshold.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct StockPosition {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub quantity: i32,
    pub reorder_point: Option<i32>,
    pub default_low_stock_threshold: Option<i32>,
}

/// One sales order line inside the trailing window.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct SalesLine {
    pub product_id: i64,
    pub quantity: i32,
}

/// One supplier/product link joined with the supplier's contact data.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct SupplierLink {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub contact_email: String,
    pub product_id: i64,
    pub is_primary: bool,
    pub lead_time_days: Option<i32>,
}

/// Immutable input to one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct AlertSnapshot {
    pub positions: Vec<StockPosition>,
    pub sales: Vec<SalesLine>,
    pub supplier_links: Vec<SupplierLink>,
}
