use crate::themes::Theme;
use ratatui::text::Span;

/// Marker drawn in the series colour before each legend entry.
pub const SWATCH: &str = "■";

/// Colour key for grouped charts: one `■ name` entry per series, coloured
/// like the series bars.
pub struct Legend<'a> {
    pub series: &'a [String],
    pub theme: &'a Theme,
}

impl<'a> Legend<'a> {
    pub fn new(series: &'a [String], theme: &'a Theme) -> Self {
        Self { series, theme }
    }

    pub fn to_spans(&self) -> Vec<Span<'a>> {
        let mut spans = Vec::with_capacity(self.series.len() * 3);
        for (i, name) in self.series.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(SWATCH, self.theme.series_style(i)));
            spans.push(Span::styled(format!(" {name}"), self.theme.label));
        }
        spans
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
