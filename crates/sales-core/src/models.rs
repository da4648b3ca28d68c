use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SalesError};

/// Header names of the sales sheet columns the analyses read.
pub mod columns {
    pub const CUSTOMER: &str = "Customer";
    pub const CATEGORY: &str = "Category";
    pub const COUNTRY: &str = "Country";
    pub const SALES: &str = "Sales";
    pub const PROFIT: &str = "Profit";
    pub const DISCOUNT: &str = "Discount";
    pub const UNITS_IN_STOCK: &str = "UnitsInStock";
}

/// Cell texts that mean "no value", as spreadsheet exports and dataframe
/// tools write them.  Matched exactly, after trimming.
pub const NA_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

/// `true` when `text` is one of the [`NA_MARKERS`].
pub fn is_na_marker(text: &str) -> bool {
    NA_MARKERS.contains(&text.trim())
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Interpret raw text the way a delimited file is read: blank or an NA
    /// marker → `Empty`, numeric → `Number`, `true`/`false` → `Bool`,
    /// anything else → `Text`.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_na_marker(trimmed) {
            return Value::Empty;
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return Value::Number(n);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// `true` for empty cells, NaN numbers and NA marker texts.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(s) => is_na_marker(s),
            Value::Bool(_) => false,
        }
    }

    /// Render the cell as a grouping key; `None` for missing cells.  Whole
    /// numbers print without a fraction so `3.0` and `3` group together.
    pub fn as_key(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            // -0.0 displays as "-0".
            Value::Number(n) if *n == 0.0 => Some("0".to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Empty => None,
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Row-oriented table of sales records.
///
/// Every row has exactly one cell per column; [`Table::push_row`] pads short
/// rows with [`Value::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from a header and rows in one step.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, padding or cutting it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Empty);
        self.rows.push(row);
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Resolve a column by name.
    ///
    /// An exact header match wins; otherwise headers are compared after
    /// lowercasing and dropping everything that is not a letter or digit,
    /// so `"Units In Stock"` resolves `"UnitsInStock"`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        if let Some(idx) = self.columns.iter().position(|c| c == name) {
            return Ok(idx);
        }
        let wanted = normalize_header(name);
        self.columns
            .iter()
            .position(|c| normalize_header(c) == wanted)
            .ok_or_else(|| SalesError::MissingColumn(name.to_string()))
    }

    /// Grouping key of the cell at (`row`, `col`); `None` for empty cells.
    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        self.rows.get(row)?.get(col)?.as_key()
    }

    /// Numeric value of the cell at (`row`, `col`).
    ///
    /// Missing cells (empty, NaN, NA markers) yield `Ok(None)`.  Booleans
    /// count as `1` / `0`.  Text that does not parse as a number is an error.
    pub fn number(&self, row: usize, col: usize) -> Result<Option<f64>> {
        let cell = match self.rows.get(row).and_then(|r| r.get(col)) {
            Some(cell) if !cell.is_missing() => cell,
            _ => return Ok(None),
        };
        match cell {
            Value::Empty => Ok(None),
            Value::Number(n) => Ok(Some(*n)),
            Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_nan() => Ok(None),
                Ok(n) => Ok(Some(n)),
                Err(_) => Err(SalesError::NotNumeric {
                    column: self.columns[col].clone(),
                    row,
                    value: s.clone(),
                }),
            },
        }
    }
}

/// Lowercase a header and strip every non-alphanumeric character.
pub fn normalize_header(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("regex is valid"));
    re.replace_all(&name.to_lowercase(), "").into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
