//! Analysis pipeline for Sales Explorer.
//!
//! Runs the aggregations for the selected charts over a loaded table and
//! bundles them into an [`AnalysisReport`] for the chart views or the JSON
//! output.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use sales_core::error::Result;
use sales_core::models::Table;
use sales_core::settings::ChartKind;
use serde::Serialize;
use tracing::info;

use crate::aggregator::{CategorySales, CustomerCategory, GroupTotal, SalesAggregator};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the aggregations.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// RFC 3339 timestamp when this report was generated.
    pub generated_at: String,
    /// Dataset the report was computed from.
    pub source: String,
    /// Number of data rows in the dataset.
    pub rows: usize,
    /// Size of the top-N lists.
    pub top: usize,
    /// Charts the report was built for.
    pub charts: Vec<ChartKind>,
    /// Wall-clock seconds spent aggregating.
    pub aggregation_time_seconds: f64,
}

/// Everything computed for one run.  Only the sections for the selected
/// charts are filled in.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_by_client: Option<Vec<GroupTotal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_by_client_category: Option<Vec<CustomerCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_by_country: Option<Vec<GroupTotal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_by_category: Option<Vec<CategorySales>>,
}

impl AnalysisReport {
    /// Pretty-printed JSON rendition of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Compute the aggregations needed by `charts`.
///
/// The per-category profit breakdown is limited to the top `top` customers by
/// profit, so those are computed whenever either profit chart is selected.
pub fn build_report(
    table: &Table,
    source: &Path,
    charts: &[ChartKind],
    top: usize,
) -> Result<AnalysisReport> {
    let started = Instant::now();
    let wants = |kind: ChartKind| charts.contains(&kind);

    let top_clients = if wants(ChartKind::Profit) || wants(ChartKind::ProfitCategory) {
        Some(SalesAggregator::profit_by_client(table, top)?)
    } else {
        None
    };

    let profit_by_client_category = match (&top_clients, wants(ChartKind::ProfitCategory)) {
        (Some(clients), true) => Some(SalesAggregator::profit_by_client_category(
            table, clients,
        )?),
        _ => None,
    };

    let quantity_by_country = if wants(ChartKind::Quantity) {
        Some(SalesAggregator::quantity_by_country(table, top)?)
    } else {
        None
    };

    let sales_by_category = if wants(ChartKind::Sales) {
        Some(SalesAggregator::sales_by_category(table)?)
    } else {
        None
    };

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        "Aggregated {} rows for {} chart(s) in {:.3}s",
        table.len(),
        charts.len(),
        elapsed
    );

    Ok(AnalysisReport {
        metadata: ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            rows: table.len(),
            top,
            charts: charts.to_vec(),
            aggregation_time_seconds: elapsed,
        },
        profit_by_client: top_clients.filter(|_| wants(ChartKind::Profit)),
        profit_by_client_category,
        quantity_by_country,
        sales_by_category,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
