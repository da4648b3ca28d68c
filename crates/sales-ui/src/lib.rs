//! Terminal UI layer for Sales Explorer.
//!
//! Turns an analysis report into bar charts and shows them one after another
//! with [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod charts;
pub mod components;
pub mod themes;

pub use sales_core as core;
