//! Shipment delay analytics
//!
//! Loads a shipment CSV, derives delivery delay metrics per row and turns
//! them into summary statistics, chart data and a Markdown report.

pub mod acquisition;
pub mod api;
pub mod calendar_names;
pub mod charts;
pub mod config;
pub mod features;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod summary;
