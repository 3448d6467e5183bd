//! Stockwatch API Library
//!
//! This crate computes low-stock alert reports for a company over a trailing
//! sales window: which product/warehouse pairs have fallen below their
//! effective reorder threshold while still showing recent demand, how many
//! days of stock remain at the current sales rate, and which supplier to
//! contact for resupply.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod alerts;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod queries;
pub mod services;

pub use alerts::{LowStockAlert, LowStockReport, SupplierContact};
pub use errors::ServiceError;
pub use services::low_stock::{LowStockAlertService, ReportParams};
