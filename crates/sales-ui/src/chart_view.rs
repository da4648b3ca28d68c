use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use sales_core::formatting::format_compact;

use crate::charts::{BarGroupData, ChartBody, ChartData, RankedBar};
use crate::components::legend::Legend;
use crate::themes::Theme;

/// Bar heights are integers; values are scaled so fractional totals still
/// produce visible bars.
const HEIGHT_SCALE: f64 = 100.0;

const MAX_BAR_WIDTH: u16 = 14;
const BAR_GAP: u16 = 1;
const GROUP_GAP: u16 = 2;

// ── Public rendering functions ────────────────────────────────────────────────

/// Render `chart` inside a bordered block filling `area`.
///
/// Layout inside the border:
///
/// 1. y-axis label with the value range (and the legend for grouped charts)
/// 2. the bars
/// 3. the x-axis label, centred
pub fn render_chart(frame: &mut Frame, area: Rect, chart: &ChartData, theme: &Theme) {
    if chart.is_empty() {
        render_no_data(frame, area, chart, theme);
        return;
    }

    let block = chart_block(chart, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [axis_area, bars_area, x_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(axis_line(chart, theme)), axis_area);

    let bar_chart = match &chart.body {
        ChartBody::Ranked(bars) => ranked_chart(bars, bars_area.width, theme),
        ChartBody::Grouped { series, groups } => {
            grouped_chart(series.len(), groups, bars_area.width, theme)
        }
    };
    frame.render_widget(bar_chart, bars_area);

    frame.render_widget(
        Paragraph::new(Span::styled(chart.x_label.as_str(), theme.axis_label))
            .alignment(Alignment::Center),
        x_area,
    );
}

/// Placeholder shown when an aggregation produced no groups.
pub fn render_no_data(frame: &mut Frame, area: Rect, chart: &ChartData, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data to plot", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "No rows had a value for both {} and {}.",
                chart.x_label, chart.y_label
            ),
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(chart_block(chart, theme)),
        area,
    );
}

/// Truncate `label` to at most `width` display columns, ending with `…`
/// when anything was cut.
pub fn truncate_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        return label.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn chart_block<'a>(chart: &'a ChartData, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.chart_border)
        .title(Span::styled(format!(" {} ", chart.title), theme.chart_title))
}

fn axis_line<'a>(chart: &'a ChartData, theme: &'a Theme) -> Line<'a> {
    let mut spans = vec![Span::styled(chart.y_label.as_str(), theme.axis_label)];

    if let Some((min, max)) = value_range(chart) {
        spans.push(Span::styled(
            format!("  (min {} · max {})", format_compact(min), format_compact(max)),
            theme.dim,
        ));
    }

    if let ChartBody::Grouped { series, .. } = &chart.body {
        spans.push(Span::raw("   "));
        spans.extend(Legend::new(series, theme).to_spans());
    }

    Line::from(spans)
}

fn value_range(chart: &ChartData) -> Option<(f64, f64)> {
    let values: Vec<f64> = match &chart.body {
        ChartBody::Ranked(bars) => bars.iter().map(|b| b.value).collect(),
        ChartBody::Grouped { groups, .. } => groups
            .iter()
            .flat_map(|g| g.values.iter().copied())
            .collect(),
    };
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    Some((min, max))
}

/// Negative values have no height; their text still shows the real value.
fn bar_height(value: f64) -> u64 {
    (value.max(0.0) * HEIGHT_SCALE).round() as u64
}

/// Widest bar that lets `count` bars separated by `gaps` columns fit in
/// `width`, never below 1.
fn fit_width(width: u16, count: usize, gaps: u16) -> u16 {
    if count == 0 {
        return 1;
    }
    let available = width.saturating_sub(gaps);
    let per_bar = available / u16::try_from(count).unwrap_or(u16::MAX);
    per_bar.clamp(1, MAX_BAR_WIDTH)
}

fn ranked_chart<'a>(bars: &'a [RankedBar], width: u16, theme: &Theme) -> BarChart<'a> {
    let gaps = BAR_GAP.saturating_mul(u16::try_from(bars.len().saturating_sub(1)).unwrap_or(0));
    let bar_width = fit_width(width, bars.len(), gaps);

    let data: Vec<Bar> = bars
        .iter()
        .map(|b| {
            Bar::default()
                .value(bar_height(b.value))
                .text_value(format_compact(b.value))
                .label(Line::from(truncate_label(&b.label, bar_width as usize)))
                .style(theme.series_style(0))
                .value_style(theme.bar_value)
        })
        .collect();

    BarChart::default()
        .data(BarGroup::default().bars(&data))
        .bar_width(bar_width)
        .bar_gap(BAR_GAP)
        .label_style(theme.bar_label)
}

fn grouped_chart<'a>(
    series_count: usize,
    groups: &'a [BarGroupData],
    width: u16,
    theme: &Theme,
) -> BarChart<'a> {
    let per_group = series_count.max(1);
    let gaps = GROUP_GAP.saturating_mul(u16::try_from(groups.len().saturating_sub(1)).unwrap_or(0));
    let bar_width = fit_width(width, groups.len() * per_group, gaps);
    let label_width = bar_width as usize * per_group;

    let mut chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(GROUP_GAP)
        .label_style(theme.bar_label);

    for group in groups {
        let bars: Vec<Bar> = group
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Bar::default()
                    .value(bar_height(v))
                    .text_value(format_compact(v))
                    .style(theme.series_style(i))
                    .value_style(theme.bar_value)
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(truncate_label(&group.label, label_width)).centered())
                .bars(&bars),
        );
    }

    chart
}

// ── Tests ─────────────────────────────────────────────────────────────────────
