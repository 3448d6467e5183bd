//! Low-stock alert derivation.
//!
//! The pipeline in [`pipeline`] is a pure function over an in-memory
//! [`snapshot::AlertSnapshot`]; it never touches the database. The query
//! layer (`crate::queries`) produces snapshots and the report service
//! (`crate::services::low_stock`) glues the two together.

pub mod pipeline;
pub mod snapshot;

use serde::{Deserialize, Serialize};

/// Resupply contact attached to an alert.
///
/// Products without any supplier link still carry this object with every
/// field null, so the serialized alert shape is stable for consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierContact {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub contact_email: Option<String>,
}

impl SupplierContact {
    /// Contact with all fields null, used when a product has no links.
    pub fn absent() -> Self {
        Self {
            id: None,
            name: None,
            contact_email: None,
        }
    }
}

/// A single low-stock alert for one (product, warehouse) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub current_stock: i32,
    pub threshold: i32,
    /// Projected days of remaining stock at the trailing average daily
    /// sales rate, rounded to 2 decimal places. Null when the rate is zero.
    pub days_until_stockout: Option<f64>,
    pub supplier: SupplierContact,
}

/// The complete report: alerts ordered most-urgent-first plus their count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockReport {
    pub alerts: Vec<LowStockAlert>,
    pub total_alerts: usize,
}
