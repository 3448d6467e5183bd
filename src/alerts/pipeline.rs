//! The alert-derivation pipeline.
//!
//! Seven stages, data flowing strictly forward: aggregate window sales per
//! product, resolve the effective reorder threshold per position, assemble
//! candidates, filter to at-risk active inventory, estimate days until
//! stockout, attach one supplier per product, rank by urgency.
//! [`derive_alerts`] composes them; every stage is also usable on its own.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::alerts::snapshot::{AlertSnapshot, SalesLine, StockPosition, SupplierLink};
use crate::alerts::{LowStockAlert, SupplierContact};

/// Sums sold quantity per product.
///
/// Products with no line in the input are absent from the map: "no sales
/// data" is distinct from an explicit zero total.
pub fn aggregate_sales(lines: &[SalesLine]) -> HashMap<i64, i64> {
    let mut totals: HashMap<i64, i64> = HashMap::new();
    for line in lines {
        *totals.entry(line.product_id).or_insert(0) += i64::from(line.quantity);
    }
    totals
}

/// Resolves the effective reorder threshold for one stock position:
/// explicit reorder point, else the product type default, else 0.
/// The result is never negative.
pub fn effective_threshold(position: &StockPosition) -> i32 {
    position
        .reorder_point
        .or(position.default_low_stock_threshold)
        .unwrap_or(0)
        .max(0)
}

/// One (product, warehouse) record with everything the filter and the
/// estimator need. `sold_qty` is `None` when the product had no window
/// sales lines at all.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    position: &'a StockPosition,
    threshold: i32,
    sold_qty: Option<i64>,
}

impl Candidate<'_> {
    /// At-risk active inventory: recent demand AND stock strictly below
    /// the threshold. Both conditions are required.
    fn is_at_risk(&self) -> bool {
        self.sold_qty.unwrap_or(0) > 0 && self.position.quantity < self.threshold
    }
}

/// Projects days of remaining stock at the trailing average daily sales
/// rate, rounded to 2 decimal places. `None` when the rate is zero or the
/// quantity is unknown; never infinite, never an error.
pub fn days_until_stockout(
    current_stock: i32,
    sold_qty: Option<i64>,
    days_window: i32,
) -> Option<f64> {
    let sold = sold_qty.unwrap_or(0);
    if sold <= 0 || days_window <= 0 {
        return None;
    }
    let avg_daily_sales = sold as f64 / f64::from(days_window);
    let days = f64::from(current_stock) / avg_daily_sales;
    Some((days * 100.0).round() / 100.0)
}

/// Deterministic ordering for a product's supplier links: primary links
/// first, then shorter lead time, a missing lead time after any known one,
/// supplier id as the final tie-break.
fn link_rank(link: &SupplierLink) -> (u8, u8, i32, i64) {
    (
        u8::from(!link.is_primary),
        u8::from(link.lead_time_days.is_none()),
        link.lead_time_days.unwrap_or(0),
        link.supplier_id,
    )
}

/// Picks exactly one supplier per linked product.
pub fn select_suppliers(links: &[SupplierLink]) -> HashMap<i64, SupplierContact> {
    let mut best: HashMap<i64, &SupplierLink> = HashMap::new();
    for link in links {
        match best.entry(link.product_id) {
            Entry::Occupied(mut slot) => {
                if link_rank(link) < link_rank(slot.get()) {
                    slot.insert(link);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(link);
            }
        }
    }

    best.into_iter()
        .map(|(product_id, link)| {
            (
                product_id,
                SupplierContact {
                    id: Some(link.supplier_id),
                    name: Some(link.supplier_name.clone()),
                    contact_email: Some(link.contact_email.clone()),
                },
            )
        })
        .collect()
}

/// Orders alerts most-depleted-relative-to-target first. Ties break by
/// product name ascending, then warehouse id, so the order is total.
pub fn rank_alerts(alerts: &mut [LowStockAlert]) {
    alerts.sort_by(|a, b| {
        let deficit_a = i64::from(a.threshold) - i64::from(a.current_stock);
        let deficit_b = i64::from(b.threshold) - i64::from(b.current_stock);
        deficit_b
            .cmp(&deficit_a)
            .then_with(|| a.product_name.cmp(&b.product_name))
            .then_with(|| a.warehouse_id.cmp(&b.warehouse_id))
    });
}

/// Runs the full pipeline over one snapshot.
pub fn derive_alerts(snapshot: &AlertSnapshot, days_window: i32) -> Vec<LowStockAlert> {
    let sold_by_product = aggregate_sales(&snapshot.sales);
    let supplier_by_product = select_suppliers(&snapshot.supplier_links);

    let mut alerts: Vec<LowStockAlert> = snapshot
        .positions
        .iter()
        .map(|position| Candidate {
            threshold: effective_threshold(position),
            sold_qty: sold_by_product.get(&position.product_id).copied(),
            position,
        })
        .filter(Candidate::is_at_risk)
        .map(|candidate| LowStockAlert {
            product_id: candidate.position.product_id,
            product_name: candidate.position.product_name.clone(),
            sku: candidate.position.sku.clone(),
            warehouse_id: candidate.position.warehouse_id,
            warehouse_name: candidate.position.warehouse_name.clone(),
            current_stock: candidate.position.quantity,
            threshold: candidate.threshold,
            days_until_stockout: days_until_stockout(
                candidate.position.quantity,
                candidate.sold_qty,
                days_window,
            ),
            supplier: supplier_by_product
                .get(&candidate.position.product_id)
                .cloned()
                .unwrap_or_else(SupplierContact::absent),
        })
        .collect();

    rank_alerts(&mut alerts);
    alerts
}
