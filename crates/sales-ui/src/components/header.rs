use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Accent placed either side of the application title.
pub const ACCENT: &str = "▁▃▅▇";

/// Chart screen header rendering three lines:
///
/// 1. Application title between accents.
/// 2. A separator as wide as the title line.
/// 3. `[ source | N rows | chart i/n ]`.
pub struct Header<'a> {
    /// Dataset file name as given on the command line.
    pub source: &'a str,
    /// Number of data rows in the dataset.
    pub rows: usize,
    /// 1-based index of the chart on screen.
    pub position: usize,
    /// Number of charts in this run.
    pub total: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        source: &'a str,
        rows: usize,
        position: usize,
        total: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            source,
            rows,
            position,
            total,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let closing: String = ACCENT.chars().rev().collect();
        let title = format!("{ACCENT} SALES EXPLORER {closing}");
        let separator = "─".repeat(title.chars().count());
        let row_word = if self.rows == 1 { "row" } else { "rows" };

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" SALES EXPLORER ", self.theme.header),
                Span::styled(closing, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(format!("{} {row_word}", self.rows), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("chart {}/{}", self.position, self.total),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
