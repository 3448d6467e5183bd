//! Read-only queries that hydrate pipeline snapshots from the database.

pub mod low_stock_queries;

pub use low_stock_queries::Query;
