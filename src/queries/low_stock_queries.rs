use crate::{
    alerts::snapshot::{SalesLine, StockPosition, SupplierLink},
    entities::{
        inventory, product, product_type, sales_order, sales_order_item, supplier,
        supplier_product, warehouse,
    },
    errors::ServiceError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}

/// Loads every stock position of the company: inventories joined with
/// their warehouse (company scope), product, and the product type's
/// default threshold. Rows of other companies never leave the database.
#[derive(Debug, Serialize, Deserialize)]
pub struct StockPositionsQuery {
    pub company_id: i64,
}

#[async_trait]
impl Query for StockPositionsQuery {
    type Result = Vec<StockPosition>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        inventory::Entity::find()
            .join(JoinType::InnerJoin, inventory::Relation::Warehouse.def())
            .join(JoinType::InnerJoin, inventory::Relation::Product.def())
            .join(JoinType::LeftJoin, product::Relation::ProductType.def())
            .filter(warehouse::Column::CompanyId.eq(self.company_id))
            .select_only()
            .column_as(inventory::Column::ProductId, "product_id")
            .column_as(product::Column::Name, "product_name")
            .column_as(product::Column::Sku, "sku")
            .column_as(inventory::Column::WarehouseId, "warehouse_id")
            .column_as(warehouse::Column::Name, "warehouse_name")
            .column_as(inventory::Column::Quantity, "quantity")
            .column_as(inventory::Column::ReorderPoint, "reorder_point")
            .column_as(
                product_type::Column::DefaultLowStockThreshold,
                "default_low_stock_threshold",
            )
            .into_model::<StockPosition>()
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Loads the sales order lines of the company inside the trailing window.
/// Aggregation happens in the pipeline, not here, so a product that sold
/// zero is distinguishable from one with no lines.
#[derive(Debug, Serialize, Deserialize)]
pub struct SalesWindowQuery {
    pub company_id: i64,
    pub since: DateTime<Utc>,
}

#[async_trait]
impl Query for SalesWindowQuery {
    type Result = Vec<SalesLine>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        sales_order_item::Entity::find()
            .join(
                JoinType::InnerJoin,
                sales_order_item::Relation::SalesOrder.def(),
            )
            .filter(sales_order::Column::CompanyId.eq(self.company_id))
            .filter(sales_order::Column::CreatedAt.gte(self.since))
            .select_only()
            .column(sales_order_item::Column::ProductId)
            .column(sales_order_item::Column::Quantity)
            .into_model::<SalesLine>()
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Loads supplier/product links (with supplier contact data) for the given
/// products.
#[derive(Debug, Serialize, Deserialize)]
pub struct SupplierLinksQuery {
    pub product_ids: Vec<i64>,
}

#[async_trait]
impl Query for SupplierLinksQuery {
    type Result = Vec<SupplierLink>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        if self.product_ids.is_empty() {
            return Ok(Vec::new());
        }

        supplier_product::Entity::find()
            .join(
                JoinType::InnerJoin,
                supplier_product::Relation::Supplier.def(),
            )
            .filter(supplier_product::Column::ProductId.is_in(self.product_ids.iter().copied()))
            .select_only()
            .column_as(supplier_product::Column::SupplierId, "supplier_id")
            .column_as(supplier::Column::Name, "supplier_name")
            .column_as(supplier::Column::ContactEmail, "contact_email")
            .column_as(supplier_product::Column::ProductId, "product_id")
            .column_as(supplier_product::Column::IsPrimary, "is_primary")
            .column_as(supplier_product::Column::LeadTimeDays, "lead_time_days")
            .into_model::<SupplierLink>()
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
