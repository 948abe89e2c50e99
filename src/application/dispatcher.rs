//! View dispatcher: routes a view request to the predictor or visualizer.

use std::sync::Arc;

use serde::Serialize;

use super::predictor::PredictorService;
use super::visualizer::{ChartSettings, VisualizerService};
use crate::domain::{
    ChartKind, ChartParams, ChartSpec, Dataset, FeatureDirective, FeatureVector, Prediction,
    Selections, View,
};
use crate::ports::Classifier;
use crate::DashboardError;

/// Per-mode input for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    Predict { selections: Selections },
    Visualize { kind: ChartKind, params: ChartParams },
}

impl ViewRequest {
    /// The view this request targets.
    #[must_use]
    pub fn view(&self) -> View {
        match self {
            Self::Predict { .. } => View::Predictor,
            Self::Visualize { kind, .. } => View::Visualizer(*kind),
        }
    }
}

/// Result of one dispatched request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "output", rename_all = "snake_case")]
pub enum ViewOutput {
    Prediction {
        outcome: Prediction,
        vector: FeatureVector,
    },
    Chart(ChartSpec),
}

/// Owns the shared dataset and model and serves both modes.
pub struct ViewDispatcher<M: Classifier> {
    dataset: Arc<Dataset>,
    predictor: PredictorService<M>,
    visualizer: VisualizerService,
}

impl<M: Classifier> ViewDispatcher<M> {
    /// Create a dispatcher over an already loaded dataset and model.
    pub fn new(dataset: Arc<Dataset>, model: Arc<M>, settings: ChartSettings) -> Self {
        let predictor = PredictorService::new(&dataset, model);
        let visualizer = VisualizerService::new(Arc::clone(&dataset), settings);
        Self {
            dataset,
            predictor,
            visualizer,
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Input directives for the predictor view.
    #[must_use]
    pub fn directives(&self) -> &[FeatureDirective] {
        self.predictor.directives()
    }

    /// Features offered by the visualizer's feature selector.
    #[must_use]
    pub fn feature_candidates(&self) -> Vec<&str> {
        self.visualizer.feature_candidates()
    }

    #[must_use]
    pub fn predictor(&self) -> &PredictorService<M> {
        &self.predictor
    }

    /// Handle one request.
    ///
    /// # Errors
    /// Returns the validation, model or chart error raised by the target view.
    pub fn dispatch(&self, request: &ViewRequest) -> Result<ViewOutput, DashboardError> {
        tracing::debug!("Dispatching request for {:?}", request.view());

        match request {
            ViewRequest::Predict { selections } => {
                let (outcome, vector) = self.predictor.run(selections)?;
                Ok(ViewOutput::Prediction { outcome, vector })
            }
            ViewRequest::Visualize { kind, params } => {
                let spec = self.visualizer.render(*kind, params)?;
                Ok(ViewOutput::Chart(spec))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::predictor::tests::{fixed, scenario_dataset, valid_selections};
    use crate::domain::{ChartError, LABEL_COLUMN};

    fn dispatcher(answer: Vec<f64>) -> ViewDispatcher<impl Classifier> {
        ViewDispatcher::new(
            Arc::new(scenario_dataset()),
            Arc::new(fixed(Ok(answer))),
            ChartSettings::default(),
        )
    }

    #[test]
    fn test_dispatch_predict() {
        let d = dispatcher(vec![0.0]);
        let request = ViewRequest::Predict {
            selections: valid_selections(),
        };
        assert_eq!(request.view(), View::Predictor);

        let output = d.dispatch(&request).expect("Should dispatch");
        let ViewOutput::Prediction { outcome, vector } = output else {
            panic!("expected prediction output");
        };
        assert_eq!(outcome, Prediction::Negative);
        assert_eq!(vector.len(), d.directives().len());
    }

    #[test]
    fn test_dispatch_visualize() {
        let d = dispatcher(vec![0.0]);
        for kind in [
            ChartKind::DatasetSummary,
            ChartKind::OutcomeDistribution,
            ChartKind::NumericDistribution,
            ChartKind::CorrelationHeatmap,
            ChartKind::FeatureByOutcome,
        ] {
            let request = ViewRequest::Visualize {
                kind,
                params: ChartParams::default(),
            };
            let output = d.dispatch(&request).expect("Should render");
            assert!(matches!(output, ViewOutput::Chart(ref spec) if spec.kind() == kind));
        }
    }

    #[test]
    fn test_dispatch_errors_are_recoverable() {
        let d = dispatcher(vec![5.0]);

        let err = d
            .dispatch(&ViewRequest::Predict {
                selections: valid_selections(),
            })
            .unwrap_err();
        assert!(matches!(err, DashboardError::ModelInvocation(_)));

        let err = d
            .dispatch(&ViewRequest::Visualize {
                kind: ChartKind::FeatureByOutcome,
                params: ChartParams::with_feature(LABEL_COLUMN),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Chart(ChartError::EmptySelection { .. })
        ));

        // Scenario dataset has no Age/DiabetesPedigreeFunction pair
        let err = d
            .dispatch(&ViewRequest::Visualize {
                kind: ChartKind::AgeVsPedigree,
                params: ChartParams::default(),
            })
            .unwrap_err();
        assert!(matches!(err, DashboardError::Chart(ChartError::MissingColumn(_))));
    }

    #[test]
    fn test_feature_candidates() {
        let d = dispatcher(vec![0.0]);
        assert_eq!(d.feature_candidates(), vec!["Age"]);
    }
}
