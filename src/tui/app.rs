//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (Home, Predictor, Visualizer)
//! - Input event handling
//! - Dispatching view requests and keeping their results for rendering

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{CsvDatasetStore, JsonModelStore, LogisticModel};
use crate::application::{ViewDispatcher, ViewOutput, ViewRequest};
use crate::config::AppConfig;
use crate::domain::{Mode, View};
use crate::ports::{Classifier, DatasetStore, ModelStore};

use super::ui::{
    home::{render_home, HomeState},
    predictor::{render_predictor, PredictorFormState},
    render_disclaimer,
    visualizer::{render_visualizer, VisualizerState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Predictor,
    Visualizer,
}

/// Main application state
pub struct App<M: Classifier = LogisticModel> {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Serves both modes over the shared dataset and model
    dispatcher: ViewDispatcher<M>,

    home_state: HomeState,
    predictor_state: PredictorFormState,
    visualizer_state: VisualizerState,
}

impl App<LogisticModel> {
    /// Create a new application instance from configuration.
    ///
    /// Loads the dataset and model once; both are shared read-only for the
    /// rest of the session.
    ///
    /// # Errors
    /// Returns error if the dataset or model cannot be loaded.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let dispatcher = load_dispatcher(config).with_context(|| {
            format!(
                "Failed to start with dataset {:?} and model {:?}",
                config.dataset_path, config.model_path
            )
        })?;
        Ok(Self::with_dependencies(dispatcher))
    }
}

/// Load the dataset and model named by `config` and wire them together.
fn load_dispatcher(config: &AppConfig) -> crate::Result<ViewDispatcher<LogisticModel>> {
    let dataset = CsvDatasetStore::new(&config.dataset_path).load_dataset()?;
    let model =
        JsonModelStore::new(&config.model_path, config.require_model_manifest).load_model()?;
    Ok(ViewDispatcher::new(
        Arc::new(dataset),
        Arc::new(model),
        config.charts,
    ))
}

impl<M: Classifier> App<M> {
    /// Create application with an injected dispatcher (Composition Root pattern).
    pub fn with_dependencies(dispatcher: ViewDispatcher<M>) -> Self {
        let dataset = dispatcher.dataset();
        let home_state = HomeState {
            dataset_rows: dataset.n_rows(),
            dataset_columns: dataset.n_columns(),
            directive_count: dispatcher.directives().len(),
            unsupported_features: dispatcher.predictor().unsupported_model_features(),
            ..HomeState::default()
        };
        let predictor_state = PredictorFormState::from_directives(dispatcher.directives());
        let visualizer_state = VisualizerState::new(
            dispatcher
                .feature_candidates()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );

        Self {
            screen: Screen::Home,
            should_quit: false,
            dispatcher,
            home_state,
            predictor_state,
            visualizer_state,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The active view, if a mode has been entered.
    #[must_use]
    pub fn current_view(&self) -> Option<View> {
        match self.screen {
            Screen::Home => None,
            Screen::Predictor => Some(View::Predictor),
            Screen::Visualizer => Some(View::Visualizer(self.visualizer_state.kind)),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Home => render_home(f, content_area, &self.home_state),
                    Screen::Predictor => {
                        render_predictor(f, content_area, &self.predictor_state)
                    }
                    Screen::Visualizer => {
                        render_visualizer(f, content_area, &self.visualizer_state)
                    }
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Predictor => self.handle_predictor_key(key),
            Screen::Visualizer => self.handle_visualizer_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.home_state.prev_mode(),
            KeyCode::Down | KeyCode::Tab => self.home_state.next_mode(),
            KeyCode::Enter => self.enter_mode(self.home_state.mode()),
            KeyCode::Char('p') | KeyCode::Char('P') => self.enter_mode(Mode::Predictor),
            KeyCode::Char('v') | KeyCode::Char('V') => self.enter_mode(Mode::Visualizer),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_predictor_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Home,
            KeyCode::Up => self.predictor_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.predictor_state.next_field(),
            KeyCode::Left => self.predictor_state.prev_value(),
            KeyCode::Right => self.predictor_state.next_value(),
            KeyCode::Delete | KeyCode::Backspace => self.predictor_state.clear_field(),
            KeyCode::Enter => self.submit_prediction(),
            _ => {}
        }
    }

    fn handle_visualizer_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Home,
            KeyCode::Up => {
                self.visualizer_state.prev_kind();
                self.refresh_chart();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.visualizer_state.next_kind();
                self.refresh_chart();
            }
            KeyCode::Left => {
                if self.visualizer_state.step_feature(false) {
                    self.refresh_chart();
                }
            }
            KeyCode::Right => {
                if self.visualizer_state.step_feature(true) {
                    self.refresh_chart();
                }
            }
            _ => {}
        }
    }

    /// Enter a mode's entry view. Only reachable from the home screen.
    fn enter_mode(&mut self, mode: Mode) {
        tracing::info!("Entering {}", mode.title());
        match View::enter(mode) {
            View::Predictor => {
                self.predictor_state =
                    PredictorFormState::from_directives(self.dispatcher.directives());
                self.screen = Screen::Predictor;
            }
            View::Visualizer(kind) => {
                self.visualizer_state.kind = kind;
                self.screen = Screen::Visualizer;
                self.refresh_chart();
            }
        }
    }

    fn submit_prediction(&mut self) {
        let request = ViewRequest::Predict {
            selections: self.predictor_state.selections(self.dispatcher.directives()),
        };

        match self.dispatcher.dispatch(&request) {
            Ok(ViewOutput::Prediction { outcome, .. }) => {
                self.home_state.tally.record(outcome);
                self.predictor_state.outcome = Some(outcome);
                self.predictor_state.error_message = None;
            }
            Ok(ViewOutput::Chart(_)) => {}
            Err(e) => {
                if e.is_recoverable() {
                    tracing::warn!("Prediction failed: {}", e);
                } else {
                    tracing::error!("Prediction failed: {}", e);
                }
                self.predictor_state.outcome = None;
                self.predictor_state.error_message = Some(e.to_string());
            }
        }
    }

    fn refresh_chart(&mut self) {
        let request = ViewRequest::Visualize {
            kind: self.visualizer_state.kind,
            params: self.visualizer_state.params(),
        };

        match self.dispatcher.dispatch(&request) {
            Ok(ViewOutput::Chart(spec)) => {
                self.home_state.tally.charts_rendered += 1;
                self.visualizer_state.spec = Some(spec);
                self.visualizer_state.error = None;
            }
            Ok(ViewOutput::Prediction { .. }) => {}
            Err(e) => {
                if e.is_recoverable() {
                    tracing::warn!("Chart rendering failed: {}", e);
                } else {
                    tracing::error!("Chart rendering failed: {}", e);
                }
                self.visualizer_state.spec = None;
                self.visualizer_state.error = Some(e.to_string());
            }
        }
    }
}
