//! Chart viewer and its terminal event loop.
//!
//! [`App`] owns the theme and the dataset summary shown in the header.
//! [`App::run_charts`] shows each chart full-screen, one after another.

use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::debug;

use crate::chart_view;
use crate::charts::ChartData;
use crate::components::header::Header;
use crate::themes::Theme;

// ── KeyAction ─────────────────────────────────────────────────────────────────

/// What a key press does to the chart sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Dismiss the current chart and show the next one.
    Next,
    /// Stop showing charts.
    Quit,
    /// Ignore the key.
    None,
}

/// Map a key event to its action.  Only presses count, so a key release on
/// terminals that report them does not skip a second chart.
pub fn key_action(key: &KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter => {
            KeyAction::Next
        }
        KeyCode::Char(' ') => KeyAction::Next,
        _ => KeyAction::None,
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    /// Dataset name shown in the header.
    pub source: String,
    /// Data rows in the dataset.
    pub rows: usize,
}

impl App {
    pub fn new(theme_name: &str, source: impl Into<String>, rows: usize) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source: source.into(),
            rows,
        }
    }

    /// Show `charts` one at a time until each has been dismissed or the user
    /// aborts with `Ctrl+C`.
    ///
    /// The terminal is restored even when drawing or reading events fails;
    /// the first error is returned afterwards.
    pub fn run_charts(&self, charts: &[ChartData]) -> io::Result<()> {
        if charts.is_empty() {
            return Ok(());
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(e);
            }
        };

        let result = self.event_loop(&mut terminal, charts);

        // Restore terminal state unconditionally.
        let restored = disable_raw_mode()
            .and_then(|()| execute!(terminal.backend_mut(), LeaveAlternateScreen))
            .and_then(|()| terminal.show_cursor());

        result.and(restored)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        charts: &[ChartData],
    ) -> io::Result<()> {
        for (index, chart) in charts.iter().enumerate() {
            debug!("Showing chart {}/{}: {}", index + 1, charts.len(), chart.title);
            loop {
                terminal.draw(|frame| self.render(frame, chart, index, charts.len()))?;

                // Block until the next event; resizes simply redraw.
                if let Event::Key(key) = event::read()? {
                    match key_action(&key) {
                        KeyAction::Next => break,
                        KeyAction::Quit => {
                            debug!("Chart display aborted");
                            return Ok(());
                        }
                        KeyAction::None => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Render one chart screen: header, chart, key hints.
    fn render(&self, frame: &mut Frame, chart: &ChartData, index: usize, total: usize) {
        let [header_area, chart_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(&self.source, self.rows, index + 1, total, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        chart_view::render_chart(frame, chart_area, chart, &self.theme);

        frame.render_widget(
            Paragraph::new(footer_line(index + 1 < total, &self.theme)),
            footer_area,
        );
    }
}

fn footer_line(has_next: bool, theme: &Theme) -> Line<'static> {
    let advance = if has_next { "next chart" } else { "close" };
    Line::from(vec![
        Span::styled("Enter/Space/q/Esc", theme.value),
        Span::styled(format!(": {advance}   "), theme.dim),
        Span::styled("Ctrl+C", theme.value),
        Span::styled(": quit", theme.dim),
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use ratatui::backend::TestBackend;
    use sales_data::aggregator::GroupTotal;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn render_to_text(app: &App, chart: &ChartData, index: usize, total: usize) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal
            .draw(|frame| app.render(frame, chart, index, total))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_app_creation() {
        let app = App::new("light", "sales.xlsx", 12);
        assert_eq!(app.source, "sales.xlsx");
        assert_eq!(app.rows, 12);
        assert_eq!(app.theme.header.fg, Theme::light().header.fg);
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let app = App::new("nonexistent", "sales.xlsx", 0);
        assert!(!app.theme.series.is_empty());
    }

    #[test]
    fn test_key_action_dismiss_keys() {
        for code in [
            KeyCode::Char('q'),
            KeyCode::Char('Q'),
            KeyCode::Esc,
            KeyCode::Enter,
            KeyCode::Char(' '),
        ] {
            assert_eq!(
                key_action(&press(code, KeyModifiers::NONE)),
                KeyAction::Next,
                "{code:?}"
            );
        }
    }

    #[test]
    fn test_key_action_ctrl_c_quits() {
        assert_eq!(
            key_action(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(
            key_action(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
            KeyAction::None
        );
    }

    #[test]
    fn test_key_action_ignores_release() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(key_action(&release), KeyAction::None);
    }

    #[test]
    fn test_run_charts_empty_is_noop() {
        // Never touches the terminal when there is nothing to show.
        App::new("dark", "s.csv", 0).run_charts(&[]).unwrap();
    }

    #[test]
    fn test_render_screen_contents() {
        let app = App::new("dark", "Product_Gallery.xlsx", 3);
        let chart = ChartData::quantity_by_country(&[GroupTotal::new("Germany", 42.0)]);
        let text = render_to_text(&app, &chart, 0, 2);

        assert!(text.contains("SALES EXPLORER"), "got:\n{text}");
        assert!(text.contains("chart 1/2"));
        assert!(text.contains("Quantity by Country"));
        assert!(text.contains("next chart"));
    }

    #[test]
    fn test_render_last_chart_footer_says_close() {
        let app = App::new("classic", "s.csv", 1);
        let chart = ChartData::profit_by_client(&[]);
        let text = render_to_text(&app, &chart, 1, 2);

        assert!(text.contains("chart 2/2"), "got:\n{text}");
        assert!(text.contains(": close"));
        assert!(text.contains("No data to plot"));
    }
}
