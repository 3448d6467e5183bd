use crate::{
    alerts::pipeline::derive_alerts,
    alerts::snapshot::AlertSnapshot,
    alerts::LowStockReport,
    db::DbPool,
    errors::ServiceError,
    queries::low_stock_queries::{Query, SalesWindowQuery, StockPositionsQuery, SupplierLinksQuery},
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Window applied when the caller does not request one.
pub const DEFAULT_DAYS_WINDOW: i32 = 30;
/// Shortest accepted trailing window.
pub const MIN_DAYS_WINDOW: i32 = 1;
/// Longest accepted trailing window.
pub const MAX_DAYS_WINDOW: i32 = 365;

/// Validated-on-use input for one report run.
///
/// An explicit out-of-range window is rejected rather than clamped; an
/// absent window falls back to [`DEFAULT_DAYS_WINDOW`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportParams {
    pub company_id: i64,
    pub days_window: Option<i32>,
}

impl ReportParams {
    /// Checks both parameters and resolves the effective window length.
    /// Runs before any query is issued.
    pub fn validate(&self) -> Result<i32, ServiceError> {
        if self.company_id <= 0 {
            return Err(ServiceError::InvalidInput(format!(
                "company id must be a positive integer, got {}",
                self.company_id
            )));
        }

        match self.days_window {
            None => Ok(DEFAULT_DAYS_WINDOW),
            Some(days) if (MIN_DAYS_WINDOW..=MAX_DAYS_WINDOW).contains(&days) => Ok(days),
            Some(days) => Err(ServiceError::InvalidInput(format!(
                "days window must be between {} and {}, got {}",
                MIN_DAYS_WINDOW, MAX_DAYS_WINDOW, days
            ))),
        }
    }
}

/// Service producing low-stock alert reports
#[derive(Clone)]
pub struct LowStockAlertService {
    db_pool: Arc<DbPool>,
}

impl LowStockAlertService {
    /// Creates a new low-stock alert service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Generates the report for one company and trailing window.
    ///
    /// Loads a company-scoped snapshot (stock positions, window sales
    /// lines, supplier links) and runs the pure derivation pipeline over
    /// it. Every call takes a fresh snapshot; nothing is cached between
    /// invocations.
    #[instrument(skip(self))]
    pub async fn generate(&self, params: ReportParams) -> Result<LowStockReport, ServiceError> {
        let days_window = params.validate()?;
        let since = Utc::now() - Duration::days(i64::from(days_window));
        let db = &*self.db_pool;

        let positions = StockPositionsQuery {
            company_id: params.company_id,
        }
        .execute(db)
        .await?;

        let sales = SalesWindowQuery {
            company_id: params.company_id,
            since,
        }
        .execute(db)
        .await?;

        let mut product_ids: Vec<i64> = positions.iter().map(|p| p.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let supplier_links = SupplierLinksQuery { product_ids }.execute(db).await?;

        let snapshot = AlertSnapshot {
            positions,
            sales,
            supplier_links,
        };

        let alerts = derive_alerts(&snapshot, days_window);

        info!(
            company_id = params.company_id,
            days_window,
            total_alerts = alerts.len(),
            "Generated low-stock alert report"
        );

        Ok(LowStockReport {
            total_alerts: alerts.len(),
            alerts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn absent_window_defaults_to_thirty_days() {
        let params = ReportParams {
            company_id: 1,
            days_window: None,
        };
        assert_eq!(params.validate().unwrap(), 30);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        for days in [1, 365] {
            let params = ReportParams {
                company_id: 1,
                days_window: Some(days),
            };
            assert_eq!(params.validate().unwrap(), days);
        }
    }

    #[test]
    fn out_of_range_window_is_rejected_not_clamped() {
        for days in [0, -5, 366, 400] {
            let params = ReportParams {
                company_id: 1,
                days_window: Some(days),
            };
            assert_matches!(params.validate(), Err(ServiceError::InvalidInput(_)));
        }
    }

    #[test]
    fn non_positive_company_id_is_rejected() {
        for company_id in [0, -1] {
            let params = ReportParams {
                company_id,
                days_window: None,
            };
            assert_matches!(params.validate(), Err(ServiceError::InvalidInput(_)));
        }
    }
}
