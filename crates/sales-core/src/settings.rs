use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};

use crate::error::SalesError;

/// Dataset read when no path is given on the command line.
pub const DEFAULT_DATA_FILE: &str = "Product_Gallery.xlsx";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore a product sales spreadsheet with terminal bar charts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-explorer",
    about = "Explore a product sales spreadsheet with terminal bar charts",
    version
)]
pub struct Settings {
    /// Spreadsheet to analyse (.xlsx, .xls, .ods or .csv)
    #[arg(default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Worksheet name (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Chart(s) to show
    #[arg(long, default_value = "all", value_parser = ["profit", "profit-category", "quantity", "sales", "all"])]
    pub chart: String,

    /// Number of entries in top-N charts (1-50)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub top: u32,

    /// Output mode
    #[arg(long, default_value = "chart", value_parser = ["chart", "json"])]
    pub output: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved preferences
    #[arg(long)]
    pub clear: bool,
}

// ── ChartKind / OutputMode ─────────────────────────────────────────────────────

/// One of the analyses the tool can chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Top customers by summed profit.
    Profit,
    /// Profit of the top customers split by product category.
    ProfitCategory,
    /// Top countries by summed units in stock.
    Quantity,
    /// Sales per category with and without discount.
    Sales,
}

impl ChartKind {
    /// Every chart, in display order.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Profit,
        ChartKind::ProfitCategory,
        ChartKind::Quantity,
        ChartKind::Sales,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Profit => "profit",
            ChartKind::ProfitCategory => "profit-category",
            ChartKind::Quantity => "quantity",
            ChartKind::Sales => "sales",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SalesError::Config(format!("unknown chart: {s}")))
    }
}

/// Where the analysis results go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Interactive terminal charts.
    Chart,
    /// Pretty-printed JSON report on stdout.
    Json,
}

impl FromStr for OutputMode {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chart" => Ok(OutputMode::Chart),
            "json" => Ok(OutputMode::Json),
            other => Err(SalesError::Config(format!("unknown output mode: {other}"))),
        }
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used preferences saved to `~/.sales-explorer/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl LastUsedParams {
    /// Default location of the preferences file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Preferences file rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".sales-explorer").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the preferences file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments, merge saved preferences for flags that
    /// were not given, and persist the result for the next run.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit arguments and
    /// preferences path.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return settings.apply_debug();
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over saved values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        // Saved values that no longer parse are ignored.
        if !is_arg_explicitly_set(&matches, "chart") {
            let valid = |v: &String| v == "all" || v.parse::<ChartKind>().is_ok();
            if let Some(v) = last.chart.filter(valid) {
                settings.chart = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top") {
            if let Some(v) = last.top.filter(|v| (1..=50).contains(v)) {
                settings.top = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output") {
            if let Some(v) = last.output.filter(|v| v.parse::<OutputMode>().is_ok()) {
                settings.output = v;
            }
        }

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::debug!("Could not persist preferences: {}", e);
        }

        settings.apply_debug()
    }

    /// Charts selected by `--chart`, in display order.
    pub fn charts(&self) -> Result<Vec<ChartKind>, SalesError> {
        if self.chart == "all" {
            return Ok(ChartKind::ALL.to_vec());
        }
        Ok(vec![self.chart.parse()?])
    }

    pub fn output_mode(&self) -> Result<OutputMode, SalesError> {
        self.output.parse()
    }

    /// `--top` as a count.  A saved value of zero is treated as one.
    pub fn top_n(&self) -> usize {
        self.top.max(1) as usize
    }

    fn apply_debug(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            chart: Some(s.chart.clone()),
            top: Some(s.top),
            output: Some(s.output.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
