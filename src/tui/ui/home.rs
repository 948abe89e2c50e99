//! Home view: mode selector and session overview.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{render_footer, render_header};
use crate::domain::{Mode, Prediction};
use crate::tui::styles::MedicalTheme;

/// Per-session counters. Nothing here outlives the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub negative: u32,
    pub positive: u32,
    pub charts_rendered: u32,
}

impl SessionTally {
    pub fn record(&mut self, outcome: Prediction) {
        match outcome {
            Prediction::Negative => self.negative += 1,
            Prediction::Positive => self.positive += 1,
        }
    }

    #[must_use]
    pub fn predictions(&self) -> u32 {
        self.negative + self.positive
    }
}

/// Home state for rendering.
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub selected_mode: usize,
    pub dataset_rows: usize,
    pub dataset_columns: usize,
    pub directive_count: usize,
    /// Model inputs the dataset cannot supply
    pub unsupported_features: Vec<String>,
    pub tally: SessionTally,
}

impl HomeState {
    #[must_use]
    pub fn mode(&self) -> Mode {
        Mode::ALL[self.selected_mode % Mode::ALL.len()]
    }

    pub fn next_mode(&mut self) {
        self.selected_mode = (self.selected_mode + 1) % Mode::ALL.len();
    }

    pub fn prev_mode(&mut self) {
        self.selected_mode = (self.selected_mode + Mode::ALL.len() - 1) % Mode::ALL.len();
    }
}

/// Render the home view.
pub fn render_home(f: &mut Frame, area: Rect, state: &HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Glucodash", "Diabetes Risk Dashboard");

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_mode_menu(f, columns[0], state);
    render_status(f, columns[1], state);

    render_footer(
        f,
        chunks[2],
        None,
        &[
            ("↑↓", "Select"),
            ("Enter", "Open"),
            ("P", "Predictor"),
            ("V", "Visualization"),
            ("Q", "Quit"),
        ],
    );
}

fn render_mode_menu(f: &mut Frame, area: Rect, state: &HomeState) {
    let selected = state.mode();
    let items: Vec<Line> = Mode::ALL
        .iter()
        .map(|mode| {
            if *mode == selected {
                Line::from(Span::styled(format!(" > {} ", mode.title()), MedicalTheme::selected()))
            } else {
                Line::from(Span::styled(format!("   {} ", mode.title()), MedicalTheme::text()))
            }
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Select the type ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    f.render_widget(Paragraph::new(items).block(block), area);
}

fn render_status(f: &mut Frame, area: Rect, state: &HomeState) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  Dataset: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{} rows × {} columns", state.dataset_rows, state.dataset_columns),
                MedicalTheme::text(),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Input features: ", MedicalTheme::text_secondary()),
            Span::styled(state.directive_count.to_string(), MedicalTheme::text()),
        ]),
    ];

    if state.unsupported_features.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("  OK ", MedicalTheme::success()),
            Span::styled("Model inputs match dataset columns", MedicalTheme::text()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  WARN ", MedicalTheme::warning()),
            Span::styled(
                format!("Model expects {}", state.unsupported_features.join(", ")),
                MedicalTheme::text(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" This session", MedicalTheme::subtitle())));
    lines.push(Line::from(vec![
        Span::styled("  Predictions: ", MedicalTheme::text_secondary()),
        Span::styled(state.tally.predictions().to_string(), MedicalTheme::text()),
        Span::styled("  Negative: ", MedicalTheme::text_secondary()),
        Span::styled(
            state.tally.negative.to_string(),
            MedicalTheme::prediction(Prediction::Negative),
        ),
        Span::styled("  Positive: ", MedicalTheme::text_secondary()),
        Span::styled(
            state.tally.positive.to_string(),
            MedicalTheme::prediction(Prediction::Positive),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Charts rendered: ", MedicalTheme::text_secondary()),
        Span::styled(state.tally.charts_rendered.to_string(), MedicalTheme::info()),
    ]));

    let block = Block::default()
        .title(Span::styled(" Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_cycling() {
        let mut state = HomeState::default();
        assert_eq!(state.mode(), Mode::Predictor);
        state.next_mode();
        assert_eq!(state.mode(), Mode::Visualizer);
        state.next_mode();
        assert_eq!(state.mode(), Mode::Predictor);
        state.prev_mode();
        assert_eq!(state.mode(), Mode::Visualizer);
    }

    #[test]
    fn test_tally() {
        let mut tally = SessionTally::default();
        tally.record(Prediction::Positive);
        tally.record(Prediction::Negative);
        tally.record(Prediction::Negative);
        assert_eq!(tally.predictions(), 3);
        assert_eq!(tally.negative, 2);
    }
}
