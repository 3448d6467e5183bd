pub mod low_stock;

pub use low_stock::LowStockAlertService;
