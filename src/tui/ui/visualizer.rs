//! Visualizer view: chart menu, feature selector and chart area.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::charts::render_chart_spec;
use super::{render_footer, render_header};
use crate::domain::{ChartKind, ChartParams, ChartSpec};
use crate::tui::styles::MedicalTheme;

/// Visualizer state
#[derive(Debug, Clone)]
pub struct VisualizerState {
    pub kind: ChartKind,
    /// Numeric features offered by the selector
    pub features: Vec<String>,
    pub feature_index: usize,
    pub spec: Option<ChartSpec>,
    pub error: Option<String>,
}

impl VisualizerState {
    #[must_use]
    pub fn new(features: Vec<String>) -> Self {
        Self {
            kind: ChartKind::ALL[0],
            features,
            feature_index: 0,
            spec: None,
            error: None,
        }
    }

    pub fn next_kind(&mut self) {
        let i = self.kind.index();
        self.kind = ChartKind::ALL[(i + 1) % ChartKind::ALL.len()];
    }

    pub fn prev_kind(&mut self) {
        let n = ChartKind::ALL.len();
        self.kind = ChartKind::ALL[(self.kind.index() + n - 1) % n];
    }

    /// Step the feature selector; returns whether anything changed.
    pub fn step_feature(&mut self, forward: bool) -> bool {
        let n = self.features.len();
        if !self.kind.needs_feature() || n < 2 {
            return false;
        }
        self.feature_index = if forward {
            (self.feature_index + 1) % n
        } else {
            (self.feature_index + n - 1) % n
        };
        true
    }

    #[must_use]
    pub fn selected_feature(&self) -> Option<&str> {
        self.features.get(self.feature_index).map(String::as_str)
    }

    /// Parameters for rendering the current chart.
    #[must_use]
    pub fn params(&self) -> ChartParams {
        if self.kind.needs_feature() {
            ChartParams {
                feature: self.selected_feature().map(str::to_string),
            }
        } else {
            ChartParams::default()
        }
    }
}

/// Render the visualizer view
pub fn render_visualizer(f: &mut Frame, area: Rect, state: &VisualizerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Diabetes Data Visualization", state.kind.title());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(42), Constraint::Min(0)])
        .split(chunks[1]);

    render_menu(f, body[0], state);
    render_chart_area(f, body[1], state);

    render_footer(
        f,
        chunks[2],
        None,
        &[("↑↓", "Chart"), ("←→", "Feature"), ("Esc", "Back")],
    );
}

fn render_menu(f: &mut Frame, area: Rect, state: &VisualizerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ChartKind::ALL.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let items: Vec<Line> = ChartKind::ALL
        .iter()
        .map(|kind| {
            if *kind == state.kind {
                Line::from(Span::styled(format!(" > {} ", kind.title()), MedicalTheme::selected()))
            } else {
                Line::from(Span::styled(format!("   {} ", kind.title()), MedicalTheme::text()))
            }
        })
        .collect();

    let menu = Paragraph::new(items).block(
        Block::default()
            .title(Span::styled(" Select visualization ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(menu, chunks[0]);

    let selector_lines = if state.kind.needs_feature() {
        match state.selected_feature() {
            Some(feature) => vec![
                Line::from(Span::styled(
                    "Select a numeric feature to visualize",
                    MedicalTheme::text_secondary(),
                )),
                Line::from(vec![
                    Span::styled(" ◀ ", MedicalTheme::key_hint()),
                    Span::styled(feature.to_string(), MedicalTheme::focused()),
                    Span::styled(" ▶", MedicalTheme::key_hint()),
                ]),
                Line::from(Span::styled(
                    format!("{}/{}", state.feature_index + 1, state.features.len()),
                    MedicalTheme::text_muted(),
                )),
            ],
            None => vec![Line::from(Span::styled(
                "No numeric features available",
                MedicalTheme::warning(),
            ))],
        }
    } else {
        vec![Line::from(Span::styled(
            "This chart has no options",
            MedicalTheme::text_muted(),
        ))]
    };

    let selector = Paragraph::new(selector_lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Options ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(selector, chunks[1]);
}

fn render_chart_area(f: &mut Frame, area: Rect, state: &VisualizerState) {
    if let Some(err) = &state.error {
        let content = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("! Cannot Render Chart", MedicalTheme::danger())),
            Line::from(""),
            Line::from(Span::styled(err.clone(), MedicalTheme::text())),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::danger()),
        );
        f.render_widget(content, area);
        return;
    }

    match &state.spec {
        Some(spec) => render_chart_spec(f, area, spec),
        None => {
            let message = Span::styled("No chart rendered", MedicalTheme::text_muted());
            let empty = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(MedicalTheme::border()),
                );
            f.render_widget(empty, area);
        }
    }
}
