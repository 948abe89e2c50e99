//! Predictor service: Input Builder plus model invocation.
//!
//! This service coordinates:
//! - Directive derivation from the dataset schema (once per session)
//! - Validation of user selections into a feature vector
//! - Classifier invocation and label interpretation

use std::sync::Arc;

use crate::domain::{
    build_feature_vector, derive_feature_directives, Dataset, FeatureDirective, FeatureVector,
    ModelInvocationError, Prediction, Selections, ValidationError,
};
use crate::ports::Classifier;
use crate::DashboardError;

/// Invoke the classifier on one feature vector and interpret its label.
///
/// # Errors
/// Returns `ModelInvocationError` if the model fails or its answer is not
/// exactly one label equal to 0 or 1.
pub fn predict<M: Classifier>(
    model: &M,
    vector: &FeatureVector,
) -> Result<Prediction, ModelInvocationError> {
    let labels = model
        .predict(vector)
        .map_err(|e| ModelInvocationError::Failed(e.to_string()))?;
    Prediction::from_single_row(&labels)
}

/// Service for building feature vectors and running predictions.
pub struct PredictorService<M: Classifier> {
    model: Arc<M>,
    directives: Vec<FeatureDirective>,
}

impl<M: Classifier> PredictorService<M> {
    /// Create a new predictor service, deriving directives from `dataset`.
    pub fn new(dataset: &Dataset, model: Arc<M>) -> Self {
        let directives = derive_feature_directives(dataset);
        tracing::info!("Derived {} feature directives", directives.len());

        let service = Self { model, directives };
        for name in service.unsupported_model_features() {
            tracing::warn!("Model feature {} has no matching dataset column", name);
        }
        service
    }

    /// Directives in display order.
    #[must_use]
    pub fn directives(&self) -> &[FeatureDirective] {
        &self.directives
    }

    /// Model inputs that no directive will ever supply.
    #[must_use]
    pub fn unsupported_model_features(&self) -> Vec<String> {
        self.model
            .feature_names()
            .into_iter()
            .filter(|name| !self.directives.iter().any(|d| d.name == *name))
            .map(str::to_string)
            .collect()
    }

    /// Validate selections into a feature vector.
    ///
    /// # Errors
    /// Returns `ValidationError` if a selection is missing or out of domain.
    pub fn build_vector(&self, selections: &Selections) -> Result<FeatureVector, ValidationError> {
        build_feature_vector(&self.directives, selections)
    }

    /// Build the vector, then predict.
    ///
    /// # Errors
    /// Returns `DashboardError::Validation` or `DashboardError::ModelInvocation`.
    pub fn run(
        &self,
        selections: &Selections,
    ) -> Result<(Prediction, FeatureVector), DashboardError> {
        let vector = self.build_vector(selections)?;
        let outcome = predict(self.model.as_ref(), &vector)?;
        tracing::info!("Prediction complete: outcome={}", outcome);
        Ok((outcome, vector))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{Column, FeatureValue, LABEL_COLUMN};

    /// Classifier returning a fixed answer, for exercising label handling.
    pub(crate) struct FixedClassifier {
        pub answer: Result<Vec<f64>, String>,
        pub features: Vec<&'static str>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    pub(crate) struct FixedError(String);

    impl Classifier for FixedClassifier {
        type Error = FixedError;

        fn predict(&self, _row: &FeatureVector) -> Result<Vec<f64>, Self::Error> {
            self.answer.clone().map_err(FixedError)
        }

        fn feature_names(&self) -> Vec<&str> {
            self.features.clone()
        }
    }

    pub(crate) fn fixed(answer: Result<Vec<f64>, String>) -> FixedClassifier {
        FixedClassifier {
            answer,
            features: vec!["BloodPressure", "Age"],
        }
    }

    pub(crate) fn scenario_dataset() -> Dataset {
        Dataset::new(vec![
            Column::categorical("BloodPressure", ["Stage1", "Normal", "Stage1", "Stage2"]),
            Column::numeric("Age", [30.0, 21.0, 25.0, 21.0]),
            Column::numeric(LABEL_COLUMN, [1.0, 0.0, 0.0, 1.0]),
        ])
        .expect("valid dataset")
    }

    pub(crate) fn valid_selections() -> Selections {
        [
            ("BloodPressure".to_string(), FeatureValue::from("Normal")),
            ("Age".to_string(), FeatureValue::Number(25.0)),
        ]
        .into_iter()
        .collect()
    }

    fn vector() -> FeatureVector {
        let directives = derive_feature_directives(&scenario_dataset());
        build_feature_vector(&directives, &valid_selections()).expect("valid")
    }

    #[test]
    fn test_predict_maps_labels() {
        assert_eq!(
            predict(&fixed(Ok(vec![1.0])), &vector()),
            Ok(Prediction::Positive)
        );
        assert_eq!(
            predict(&fixed(Ok(vec![0.0])), &vector()),
            Ok(Prediction::Negative)
        );
    }

    #[test]
    fn test_predict_rejects_bad_answers() {
        assert_eq!(
            predict(&fixed(Ok(vec![2.0])), &vector()),
            Err(ModelInvocationError::NonBinaryLabel(2.0))
        );
        assert_eq!(
            predict(&fixed(Ok(vec![])), &vector()),
            Err(ModelInvocationError::UnexpectedShape { labels: 0 })
        );
        assert_eq!(
            predict(&fixed(Err("boom".into())), &vector()),
            Err(ModelInvocationError::Failed("boom".into()))
        );
    }

    #[test]
    fn test_service_run() {
        let service = PredictorService::new(&scenario_dataset(), Arc::new(fixed(Ok(vec![1.0]))));
        assert_eq!(service.directives().len(), 2);
        assert!(service.unsupported_model_features().is_empty());

        let (outcome, vector) = service.run(&valid_selections()).expect("Should predict");
        assert_eq!(outcome, Prediction::Positive);
        assert_eq!(vector.len(), 2);

        let err = service.run(&Selections::new()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Validation(ValidationError::MissingSelection { .. })
        ));
    }

    #[test]
    fn test_unsupported_model_features() {
        let model = FixedClassifier {
            answer: Ok(vec![0.0]),
            features: vec!["Age", "Insulin"],
        };
        let service = PredictorService::new(&scenario_dataset(), Arc::new(model));
        assert_eq!(service.unsupported_model_features(), vec!["Insulin".to_string()]);
    }
}
