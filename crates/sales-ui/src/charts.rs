//! Chart descriptions built from an [`AnalysisReport`].
//!
//! A [`ChartData`] carries only what the bar chart view needs: a title, axis
//! labels and the bar values.

use sales_core::settings::ChartKind;
use sales_data::aggregator::{CategorySales, CustomerCategory, GroupTotal};
use sales_data::analysis::AnalysisReport;

/// One bar of a ranked chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBar {
    pub label: String,
    pub value: f64,
}

/// One group of a grouped chart: a label plus one value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroupData {
    pub label: String,
    pub values: Vec<f64>,
}

/// What kind of bars to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    /// One bar per key.
    Ranked(Vec<RankedBar>),
    /// One group per key, one bar per series inside each group.
    Grouped {
        series: Vec<String>,
        groups: Vec<BarGroupData>,
    },
}

/// A chart ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

impl ChartData {
    /// `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            ChartBody::Ranked(bars) => bars.is_empty(),
            ChartBody::Grouped { groups, .. } => groups.is_empty(),
        }
    }

    /// Top customers by profit.
    pub fn profit_by_client(totals: &[GroupTotal]) -> Self {
        Self::ranked("Profit by client", "Client", "Profit", totals)
    }

    /// Top countries by units in stock.
    pub fn quantity_by_country(totals: &[GroupTotal]) -> Self {
        Self::ranked("Quantity by Country", "Country", "Quantity", totals)
    }

    /// Profit per customer, one bar per category.
    ///
    /// Customers keep the order of `rows`; categories are sorted by name.
    /// Customers without a given category get a zero bar for it.
    pub fn profit_by_category(rows: &[CustomerCategory]) -> Self {
        let mut series: Vec<String> = rows.iter().map(|r| r.category.clone()).collect();
        series.sort();
        series.dedup();

        let mut groups: Vec<BarGroupData> = Vec::new();
        for row in rows {
            let idx = match groups.iter().position(|g| g.label == row.customer) {
                Some(idx) => idx,
                None => {
                    groups.push(BarGroupData {
                        label: row.customer.clone(),
                        values: vec![0.0; series.len()],
                    });
                    groups.len() - 1
                }
            };
            if let Ok(s) = series.binary_search(&row.category) {
                groups[idx].values[s] += row.profit;
            }
        }

        Self {
            title: "Profit by category".to_string(),
            x_label: "Customer".to_string(),
            y_label: "Profit".to_string(),
            body: ChartBody::Grouped { series, groups },
        }
    }

    /// Sales per category with and without discount.
    pub fn sales_by_category(rows: &[CategorySales]) -> Self {
        let groups = rows
            .iter()
            .map(|r| BarGroupData {
                label: r.category.clone(),
                values: vec![r.sales_with_discount, r.sales_without_discount],
            })
            .collect();

        Self {
            title: "Sales by category".to_string(),
            x_label: "Category".to_string(),
            y_label: "Sales".to_string(),
            body: ChartBody::Grouped {
                series: vec![
                    "SalesWithDiscount".to_string(),
                    "SalesWithoutDiscount".to_string(),
                ],
                groups,
            },
        }
    }

    fn ranked(title: &str, x_label: &str, y_label: &str, totals: &[GroupTotal]) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            body: ChartBody::Ranked(
                totals
                    .iter()
                    .map(|t| RankedBar {
                        label: t.key.clone(),
                        value: t.total,
                    })
                    .collect(),
            ),
        }
    }
}

/// Build the charts for `kinds`, in that order, from the sections present in
/// `report`.  Kinds whose section is missing are skipped.
pub fn charts_from_report(report: &AnalysisReport, kinds: &[ChartKind]) -> Vec<ChartData> {
    kinds
        .iter()
        .filter_map(|kind| match kind {
            ChartKind::Profit => report
                .profit_by_client
                .as_deref()
                .map(ChartData::profit_by_client),
            ChartKind::ProfitCategory => report
                .profit_by_client_category
                .as_deref()
                .map(ChartData::profit_by_category),
            ChartKind::Quantity => report
                .quantity_by_country
                .as_deref()
                .map(ChartData::quantity_by_country),
            ChartKind::Sales => report
                .sales_by_category
                .as_deref()
                .map(ChartData::sales_by_category),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
