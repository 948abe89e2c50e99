//! Predictor view: one selector per feature directive.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{render_footer, render_header};
use crate::domain::{FeatureDirective, Prediction, Selections};
use crate::tui::styles::MedicalTheme;

/// Selector for one directive
#[derive(Debug, Clone)]
pub struct SelectorField {
    pub label: String,
    pub choices: Vec<String>,
    /// Index into the directive's domain; `None` when cleared
    pub selected: Option<usize>,
    pub note: Option<&'static str>,
}

/// Predictor form state
#[derive(Debug, Clone, Default)]
pub struct PredictorFormState {
    pub fields: Vec<SelectorField>,
    pub selected_field: usize,
    pub outcome: Option<Prediction>,
    pub error_message: Option<String>,
}

impl PredictorFormState {
    /// One selector per directive, each starting at the first domain value.
    #[must_use]
    pub fn from_directives(directives: &[FeatureDirective]) -> Self {
        let fields = directives
            .iter()
            .map(|d| SelectorField {
                label: d.name.clone(),
                choices: d.domain.iter().map(ToString::to_string).collect(),
                selected: if d.domain.is_empty() { None } else { Some(0) },
                note: d.note,
            })
            .collect();
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected_field = (self.selected_field + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Step the current selector forward through its domain.
    pub fn next_value(&mut self) {
        self.step_value(true);
    }

    /// Step the current selector backward through its domain.
    pub fn prev_value(&mut self) {
        self.step_value(false);
    }

    fn step_value(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.selected_field) else {
            return;
        };
        let n = field.choices.len();
        if n == 0 {
            return;
        }
        field.selected = Some(match (field.selected, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        });
        self.outcome = None;
        self.error_message = None;
    }

    /// Clear the current selector.
    pub fn clear_field(&mut self) {
        if let Some(field) = self.fields.get_mut(self.selected_field) {
            field.selected = None;
            self.outcome = None;
        }
    }

    /// Current selections keyed by directive name.
    #[must_use]
    pub fn selections(&self, directives: &[FeatureDirective]) -> Selections {
        self.fields
            .iter()
            .zip(directives)
            .filter_map(|(field, directive)| {
                let value = directive.domain.get(field.selected?)?;
                Some((directive.name.clone(), value.clone()))
            })
            .collect()
    }

    #[must_use]
    pub fn current_note(&self) -> Option<&'static str> {
        self.fields.get(self.selected_field).and_then(|f| f.note)
    }
}

/// Render the predictor view
pub fn render_predictor(f: &mut Frame, area: Rect, state: &PredictorFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        "Diabetes Predictor",
        "Provide your current medical parameters",
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_form_fields(f, body[0], state);
    render_side_panel(f, body[1], state);

    render_footer(
        f,
        chunks[2],
        state.error_message.as_deref(),
        &[
            ("↑↓", "Field"),
            ("←→", "Value"),
            ("Del", "Clear"),
            ("Enter", "Predict"),
            ("Esc", "Back"),
        ],
    );
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PredictorFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(f, columns[1], &state.fields[mid..], mid, state.selected_field);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[SelectorField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = match field.selected.and_then(|i| field.choices.get(i)) {
            Some(choice) => Span::styled(choice.clone(), MedicalTheme::text()),
            None => Span::styled("not selected", MedicalTheme::text_muted()),
        };
        let position = match field.selected {
            Some(i) => format!("  {}/{}", i + 1, field.choices.len()),
            None => format!("  -/{}", field.choices.len()),
        };

        let content = Paragraph::new(Line::from(vec![
            Span::styled(if is_selected { " ◀ " } else { "   " }, MedicalTheme::key_hint()),
            value,
            Span::styled(if is_selected { " ▶" } else { "" }, MedicalTheme::key_hint()),
            Span::styled(position, MedicalTheme::text_muted()),
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_side_panel(f: &mut Frame, area: Rect, state: &PredictorFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let note = match state.current_note() {
        Some(note) => Paragraph::new(Span::styled(note, MedicalTheme::info())),
        None => Paragraph::new(Span::styled(
            "Values come from the reference dataset.",
            MedicalTheme::text_muted(),
        )),
    }
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Notes ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(note, chunks[0]);

    let result_block = Block::default()
        .title(Span::styled(" Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let lines = match state.outcome {
        Some(outcome) => vec![
            Line::from(""),
            Line::from(Span::styled(outcome.to_string(), MedicalTheme::prediction(outcome))),
            Line::from(""),
            Line::from(Span::styled(outcome.description(), MedicalTheme::text())),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled("Press [Enter] to predict", MedicalTheme::text_muted())),
        ],
    };

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(result_block),
        chunks[1],
    );
}
