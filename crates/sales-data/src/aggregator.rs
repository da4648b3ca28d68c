//! Grouped aggregations behind each chart.
//!
//! Every function derives a fresh summary from the loaded [`Table`].  Column
//! lookups and numeric conversions are not recovered here: a missing or
//! malformed column propagates as a [`sales_core::SalesError`].

use std::collections::{BTreeMap, HashMap};

use sales_core::error::Result;
use sales_core::models::{columns, Table};
use serde::Serialize;
use tracing::debug;

// ── Result types ──────────────────────────────────────────────────────────────

/// Sum of one value column for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

impl GroupTotal {
    pub fn new(key: impl Into<String>, total: f64) -> Self {
        Self {
            key: key.into(),
            total,
        }
    }
}

/// Profit and sales of one customer within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerCategory {
    pub customer: String,
    pub category: String,
    pub profit: f64,
    pub sales: f64,
}

/// Sales of one category split by whether a discount applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategorySales {
    pub category: String,
    /// Sales from rows with a discount above zero.
    pub sales_with_discount: f64,
    /// Sales from rows with a discount of exactly zero.
    pub sales_without_discount: f64,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups sales records.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Sum `value` per distinct `key`, ordered by key.
    ///
    /// Rows with an empty key are dropped.  Empty values contribute nothing,
    /// so a key whose values are all empty still appears with a zero total.
    pub fn group_sum(table: &Table, key: &str, value: &str) -> Result<Vec<GroupTotal>> {
        let key_col = table.column_index(key)?;
        let value_col = table.column_index(value)?;

        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        for row in 0..table.len() {
            let amount = table.number(row, value_col)?;
            let Some(k) = table.text(row, key_col) else {
                continue;
            };
            *sums.entry(k).or_insert(0.0) += amount.unwrap_or(0.0);
        }

        debug!("group_sum({key}, {value}): {} groups", sums.len());

        Ok(sums
            .into_iter()
            .map(|(key, total)| GroupTotal { key, total })
            .collect())
    }

    /// Sort descending by total and keep the first `n`.  Equal totals keep
    /// their incoming order.
    pub fn top_n(mut totals: Vec<GroupTotal>, n: usize) -> Vec<GroupTotal> {
        totals.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        totals.truncate(n);
        totals
    }

    /// The `n` customers with the highest summed profit.
    pub fn profit_by_client(table: &Table, n: usize) -> Result<Vec<GroupTotal>> {
        let totals = Self::group_sum(table, columns::CUSTOMER, columns::PROFIT)?;
        Ok(Self::top_n(totals, n))
    }

    /// The `n` countries with the most units in stock.
    pub fn quantity_by_country(table: &Table, n: usize) -> Result<Vec<GroupTotal>> {
        let totals = Self::group_sum(table, columns::COUNTRY, columns::UNITS_IN_STOCK)?;
        Ok(Self::top_n(totals, n))
    }

    /// Profit and sales per (customer, category) for the given customers.
    ///
    /// Output follows the order of `customers`, then category name.
    pub fn profit_by_client_category(
        table: &Table,
        customers: &[GroupTotal],
    ) -> Result<Vec<CustomerCategory>> {
        let customer_col = table.column_index(columns::CUSTOMER)?;
        let category_col = table.column_index(columns::CATEGORY)?;
        let profit_col = table.column_index(columns::PROFIT)?;
        let sales_col = table.column_index(columns::SALES)?;

        let rank: HashMap<&str, usize> = customers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key.as_str(), i))
            .collect();

        let mut sums: BTreeMap<(usize, String), (f64, f64)> = BTreeMap::new();
        for row in 0..table.len() {
            let profit = table.number(row, profit_col)?.unwrap_or(0.0);
            let sales = table.number(row, sales_col)?.unwrap_or(0.0);
            let (Some(customer), Some(category)) =
                (table.text(row, customer_col), table.text(row, category_col))
            else {
                continue;
            };
            let Some(&position) = rank.get(customer.as_str()) else {
                continue;
            };
            let entry = sums.entry((position, category)).or_insert((0.0, 0.0));
            entry.0 += profit;
            entry.1 += sales;
        }

        Ok(sums
            .into_iter()
            .map(|((position, category), (profit, sales))| CustomerCategory {
                customer: customers[position].key.clone(),
                category,
                profit,
                sales,
            })
            .collect())
    }

    /// Sales per category split into discounted and undiscounted sales.
    ///
    /// Rows are grouped by (category, discount) first.  A discount of zero
    /// counts towards `sales_without_discount`, a positive discount towards
    /// `sales_with_discount`.  Negative discounts count towards neither, and
    /// rows without a discount are left out entirely.
    pub fn sales_by_category(table: &Table) -> Result<Vec<CategorySales>> {
        let category_col = table.column_index(columns::CATEGORY)?;
        let discount_col = table.column_index(columns::DISCOUNT)?;
        let sales_col = table.column_index(columns::SALES)?;

        let mut by_category: BTreeMap<String, CategorySales> = BTreeMap::new();
        for row in 0..table.len() {
            let sales = table.number(row, sales_col)?.unwrap_or(0.0);
            let discount = table.number(row, discount_col)?;
            let (Some(category), Some(discount)) = (table.text(row, category_col), discount)
            else {
                continue;
            };

            let entry = by_category
                .entry(category.clone())
                .or_insert_with(|| CategorySales {
                    category,
                    ..Default::default()
                });
            if discount == 0.0 {
                entry.sales_without_discount += sales;
            } else if discount > 0.0 {
                entry.sales_with_discount += sales;
            }
        }

        Ok(by_category.into_values().collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
