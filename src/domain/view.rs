//! Top-level dashboard views.

use serde::{Deserialize, Serialize};

use super::chart::ChartKind;

/// Dashboard mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Predictor,
    Visualizer,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Predictor, Mode::Visualizer];

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Predictor => "Diabetes Predictor",
            Self::Visualizer => "Visualization",
        }
    }
}

/// The active view: a mode plus, for the visualizer, its chart kind.
///
/// Views are only entered by explicit selection; switching view carries no
/// state over except the shared dataset and model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Predictor,
    Visualizer(ChartKind),
}

impl View {
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::Predictor => Mode::Predictor,
            Self::Visualizer(_) => Mode::Visualizer,
        }
    }

    /// Entry view for a mode. The visualizer opens on the first chart kind.
    #[must_use]
    pub fn enter(mode: Mode) -> Self {
        match mode {
            Mode::Predictor => Self::Predictor,
            Mode::Visualizer => Self::Visualizer(ChartKind::ALL[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_mode() {
        assert_eq!(View::enter(Mode::Predictor), View::Predictor);
        assert_eq!(
            View::enter(Mode::Visualizer),
            View::Visualizer(ChartKind::DatasetSummary)
        );
        assert_eq!(View::Visualizer(ChartKind::AgeVsPedigree).mode(), Mode::Visualizer);
    }
}
