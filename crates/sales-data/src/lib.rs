//! Data layer for Sales Explorer.
//!
//! Loads a spreadsheet (or CSV export) into a [`sales_core::Table`], runs the
//! grouped aggregations behind each chart and assembles them into an
//! [`analysis::AnalysisReport`].

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use sales_core as core;
