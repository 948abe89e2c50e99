//! Visualizer service: Chart recipes over the shared dataset.
//!
//! Each `ChartKind` maps to one recipe. Recipes borrow the dataset
//! immutably and return a display-ready `ChartSpec`.

use std::sync::Arc;

use crate::domain::chart::{
    BoxGroup, BoxPlotChart, ChartColor, ColorScale, DistributionChart, Heatmap, PieChart,
    PieSlice, ScatterChart, ScatterSeries, SummaryView,
};
use crate::domain::stats::{box_summary, density_histogram, describe, gaussian_kde, pearson};
use crate::domain::{
    ChartError, ChartKind, ChartParams, ChartSpec, ColumnKind, Dataset, Prediction, LABEL_COLUMN,
};

const AGE_COLUMN: &str = "Age";
const PEDIGREE_COLUMN: &str = "DiabetesPedigreeFunction";
const OUTCOME_AXIS_TITLE: &str = "Diabetes Outcome";

/// Tunable chart parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSettings {
    /// Rows shown in the dataset summary head
    pub head_rows: usize,
    /// Histogram bin count
    pub bins: usize,
    /// Density curve sample count
    pub kde_points: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            head_rows: 5,
            bins: 20,
            kde_points: 200,
        }
    }
}

/// Service producing chart specifications.
pub struct VisualizerService {
    dataset: Arc<Dataset>,
    settings: ChartSettings,
}

impl VisualizerService {
    /// Create a new visualizer service.
    pub fn new(dataset: Arc<Dataset>, settings: ChartSettings) -> Self {
        Self { dataset, settings }
    }

    /// Numeric features offered by the feature selector.
    #[must_use]
    pub fn feature_candidates(&self) -> Vec<&str> {
        feature_candidates(&self.dataset)
    }

    /// Render one chart.
    ///
    /// # Errors
    /// Returns `ChartError` if the chart cannot be built from the dataset.
    pub fn render(&self, kind: ChartKind, params: &ChartParams) -> Result<ChartSpec, ChartError> {
        render_chart(&self.dataset, kind, params, &self.settings)
    }
}

/// Numeric columns other than the label, in dataset order.
#[must_use]
pub fn feature_candidates(dataset: &Dataset) -> Vec<&str> {
    dataset
        .numeric_features()
        .map(|c| c.name.as_str())
        .collect()
}

/// Build the chart specification for `kind`.
///
/// # Errors
/// Returns `ChartError::EmptySelection` when a feature chart has nothing
/// eligible to plot, and `MissingColumn` / `NotNumeric` when a fixed column
/// is absent or categorical.
pub fn render_chart(
    dataset: &Dataset,
    kind: ChartKind,
    params: &ChartParams,
    settings: &ChartSettings,
) -> Result<ChartSpec, ChartError> {
    tracing::debug!("Rendering chart {:?} with {:?}", kind, params);

    let spec = match kind {
        ChartKind::DatasetSummary => ChartSpec::Summary(summary(dataset, settings)),
        ChartKind::OutcomeDistribution => ChartSpec::Pie(outcome_pie(dataset)?),
        ChartKind::NumericDistribution => {
            ChartSpec::Distribution(distribution(dataset, kind, params, settings)?)
        }
        ChartKind::CorrelationHeatmap => ChartSpec::Heatmap(correlation_heatmap(dataset)),
        ChartKind::FeatureByOutcome => {
            ChartSpec::BoxPlot(feature_by_outcome(dataset, kind, params)?)
        }
        ChartKind::AgeVsPedigree => ChartSpec::Scatter(age_vs_pedigree(dataset)?),
    };
    Ok(spec)
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a [f64], ChartError> {
    let column = dataset
        .column(name)
        .ok_or_else(|| ChartError::MissingColumn(name.to_string()))?;
    column
        .as_numeric()
        .ok_or_else(|| ChartError::NotNumeric(name.to_string()))
}

fn select_feature<'a>(
    dataset: &'a Dataset,
    kind: ChartKind,
    params: &ChartParams,
) -> Result<(&'a str, &'a [f64]), ChartError> {
    let candidates = feature_candidates(dataset);
    if candidates.is_empty() {
        return Err(ChartError::EmptySelection {
            chart: kind,
            reason: "dataset has no numeric features".to_string(),
        });
    }

    let name = match params.feature.as_deref() {
        None => candidates[0],
        Some(requested) => candidates
            .iter()
            .copied()
            .find(|c| *c == requested)
            .ok_or_else(|| ChartError::EmptySelection {
                chart: kind,
                reason: format!("{requested} is not a numeric feature"),
            })?,
    };

    Ok((name, numeric_column(dataset, name)?))
}

fn summary(dataset: &Dataset, settings: &ChartSettings) -> SummaryView {
    SummaryView {
        columns: dataset.column_names().map(str::to_string).collect(),
        head: dataset.head(settings.head_rows),
        statistics: describe(dataset.columns()),
        shape: (dataset.n_rows(), dataset.n_columns()),
    }
}

fn outcome_pie(dataset: &Dataset) -> Result<PieChart, ChartError> {
    let labels = numeric_column(dataset, LABEL_COLUMN)?;
    let positives = labels.iter().filter(|v| **v == 1.0).count();
    let negatives = labels.len() - positives;
    let total = labels.len() as f64;

    let counts = [
        (Prediction::Negative, negatives),
        (Prediction::Positive, positives),
    ];
    let mut slices: Vec<PieSlice> = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(outcome, count)| PieSlice {
            label: outcome.to_string(),
            count,
            fraction: count as f64 / total,
            color: ChartColor::for_label(outcome.label()),
        })
        .collect();
    slices.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    Ok(PieChart {
        title: ChartKind::OutcomeDistribution.title().to_string(),
        slices,
    })
}

fn distribution(
    dataset: &Dataset,
    kind: ChartKind,
    params: &ChartParams,
    settings: &ChartSettings,
) -> Result<DistributionChart, ChartError> {
    let (feature, values) = select_feature(dataset, kind, params)?;
    let bins = density_histogram(values, settings.bins);
    let bin_size = bins.first().map_or(0.0, |b| b.end - b.start);

    Ok(DistributionChart {
        title: format!("Distribution of {feature}"),
        feature: feature.to_string(),
        bin_size,
        bins,
        density_curve: gaussian_kde(values, settings.kde_points),
    })
}

fn correlation_heatmap(dataset: &Dataset) -> Heatmap {
    let columns: Vec<(&str, &[f64])> = dataset
        .columns_of_kind(ColumnKind::Numeric)
        .filter_map(|c| c.as_numeric().map(|v| (c.name.as_str(), v)))
        .collect();

    let n = columns.len();
    let mut cells = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                pearson(columns[i].1, columns[i].1).map(|_| 1.0)
            } else {
                pearson(columns[i].1, columns[j].1)
            };
            cells[i][j] = r;
            cells[j][i] = r;
        }
    }

    Heatmap {
        title: "Correlation Heatmap".to_string(),
        labels: columns.iter().map(|(name, _)| (*name).to_string()).collect(),
        cells,
        scale: ColorScale::RdBuReversed,
        range: (-1.0, 1.0),
    }
}

fn feature_by_outcome(
    dataset: &Dataset,
    kind: ChartKind,
    params: &ChartParams,
) -> Result<BoxPlotChart, ChartError> {
    let (feature, values) = select_feature(dataset, kind, params)?;
    let labels = numeric_column(dataset, LABEL_COLUMN)?;

    let groups = [0u8, 1u8]
        .into_iter()
        .filter_map(|label| {
            let group: Vec<f64> = values
                .iter()
                .zip(labels)
                .filter(|(_, l)| **l == f64::from(label))
                .map(|(v, _)| *v)
                .collect();
            box_summary(&group).map(|summary| BoxGroup {
                label,
                name: label.to_string(),
                color: ChartColor::for_label(label),
                summary,
            })
        })
        .collect();

    Ok(BoxPlotChart {
        title: format!("{feature} by Outcome"),
        feature: feature.to_string(),
        x_title: OUTCOME_AXIS_TITLE.to_string(),
        groups,
    })
}

fn age_vs_pedigree(dataset: &Dataset) -> Result<ScatterChart, ChartError> {
    let ages = numeric_column(dataset, AGE_COLUMN)?;
    let pedigree = numeric_column(dataset, PEDIGREE_COLUMN)?;
    let labels = numeric_column(dataset, LABEL_COLUMN)?;

    let series = [0u8, 1u8]
        .into_iter()
        .map(|label| ScatterSeries {
            label,
            color: ChartColor::for_label(label),
            points: ages
                .iter()
                .zip(pedigree)
                .zip(labels)
                .filter(|(_, l)| **l == f64::from(label))
                .map(|((x, y), _)| (*x, *y))
                .collect(),
        })
        .filter(|s| !s.points.is_empty())
        .collect();

    Ok(ScatterChart {
        title: "Age vs Diabetes Pedigree Function by Outcome".to_string(),
        x_title: "Age".to_string(),
        y_title: "Diabetes Pedigree Function".to_string(),
        legend_title: OUTCOME_AXIS_TITLE.to_string(),
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn outcome_dataset(positives: usize, negatives: usize) -> Dataset {
        let n = positives + negatives;
        let labels = (0..n).map(|i| if i < positives { 1.0 } else { 0.0 });
        Dataset::new(vec![
            Column::numeric("Glucose", (0..n).map(|i| 80.0 + i as f64)),
            Column::numeric(LABEL_COLUMN, labels),
        ])
        .expect("valid dataset")
    }

    fn clinical_dataset() -> Dataset {
        Dataset::new(vec![
            Column::categorical("BMI", ["Obesity", "Healthy Weight", "Obesity", "Underweight"]),
            Column::numeric("Glucose", [148.0, 85.0, 183.0, 89.0]),
            Column::numeric(AGE_COLUMN, [50.0, 31.0, 32.0, 21.0]),
            Column::numeric(PEDIGREE_COLUMN, [0.627, 0.351, 0.672, 0.167]),
            Column::numeric(LABEL_COLUMN, [1.0, 0.0, 1.0, 0.0]),
        ])
        .expect("valid dataset")
    }

    fn render(
        ds: &Dataset,
        kind: ChartKind,
        params: &ChartParams,
    ) -> Result<ChartSpec, ChartError> {
        render_chart(ds, kind, params, &ChartSettings::default())
    }

    #[test]
    fn test_outcome_pie_counts_and_colors() {
        let ds = outcome_dataset(35, 65);
        let spec = render(&ds, ChartKind::OutcomeDistribution, &ChartParams::default())
            .expect("Should render");
        let ChartSpec::Pie(pie) = spec else {
            panic!("expected pie chart");
        };

        assert_eq!(pie.slices.len(), 2);
        assert_eq!(pie.slices[0].label, "Negative");
        assert_eq!(pie.slices[0].count, 65);
        assert_eq!(pie.slices[0].color, ChartColor::Green);
        assert_eq!(pie.slices[1].label, "Positive");
        assert_eq!(pie.slices[1].count, 35);
        assert_eq!(pie.slices[1].color, ChartColor::Red);
        assert!(approx(pie.slices.iter().map(|s| s.fraction).sum(), 1.0));
    }

    #[test]
    fn test_outcome_pie_single_class_and_missing_label() {
        let ds = outcome_dataset(3, 0);
        let Ok(ChartSpec::Pie(pie)) =
            render(&ds, ChartKind::OutcomeDistribution, &ChartParams::default())
        else {
            panic!("expected pie chart");
        };
        assert_eq!(pie.slices.len(), 1);
        assert_eq!(pie.slices[0].label, "Positive");

        let no_label = Dataset::new(vec![Column::numeric("Glucose", [1.0])]).expect("valid");
        assert_eq!(
            render(&no_label, ChartKind::OutcomeDistribution, &ChartParams::default()),
            Err(ChartError::MissingColumn(LABEL_COLUMN.into()))
        );
    }

    #[test]
    fn test_heatmap_perfect_correlation() {
        let ds = Dataset::new(vec![
            Column::numeric("A", [1.0, 2.0, 3.0]),
            Column::numeric("B", [2.0, 4.0, 6.0]),
            Column::numeric(LABEL_COLUMN, [0.0, 1.0, 0.0]),
        ])
        .expect("valid dataset");

        let Ok(ChartSpec::Heatmap(heatmap)) =
            render(&ds, ChartKind::CorrelationHeatmap, &ChartParams::default())
        else {
            panic!("expected heatmap");
        };

        assert_eq!(heatmap.labels, vec!["A", "B", LABEL_COLUMN]);
        assert!(approx(heatmap.get(0, 1).expect("defined"), 1.0));
        assert!(approx(heatmap.get(0, 0).expect("defined"), 1.0));
        assert!(approx(heatmap.get(0, 2).expect("defined"), 0.0));
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(heatmap.get(i, j), heatmap.get(j, i));
            }
        }
        assert_eq!(heatmap.scale, ColorScale::RdBuReversed);
    }

    #[test]
    fn test_heatmap_constant_column_is_undefined() {
        let ds = Dataset::new(vec![
            Column::numeric("A", [1.0, 2.0, 3.0]),
            Column::numeric("C", [5.0, 5.0, 5.0]),
        ])
        .expect("valid dataset");
        let Ok(ChartSpec::Heatmap(heatmap)) =
            render(&ds, ChartKind::CorrelationHeatmap, &ChartParams::default())
        else {
            panic!("expected heatmap");
        };
        assert_eq!(heatmap.get(0, 1), None);
        assert_eq!(heatmap.get(1, 1), None);
    }

    #[test]
    fn test_label_is_not_a_selectable_feature() {
        let ds = clinical_dataset();
        for kind in [ChartKind::NumericDistribution, ChartKind::FeatureByOutcome] {
            let err = render(&ds, kind, &ChartParams::with_feature(LABEL_COLUMN)).unwrap_err();
            assert!(matches!(err, ChartError::EmptySelection { chart, .. } if chart == kind));

            let err = render(&ds, kind, &ChartParams::with_feature("BMI")).unwrap_err();
            assert!(matches!(err, ChartError::EmptySelection { .. }));
        }
    }

    #[test]
    fn test_no_numeric_features_is_empty_selection() {
        let ds = Dataset::new(vec![
            Column::categorical("BMI", ["Obesity", "Healthy Weight"]),
            Column::numeric(LABEL_COLUMN, [1.0, 0.0]),
        ])
        .expect("valid dataset");
        assert!(feature_candidates(&ds).is_empty());
        assert!(matches!(
            render(&ds, ChartKind::NumericDistribution, &ChartParams::default()),
            Err(ChartError::EmptySelection { .. })
        ));
    }

    #[test]
    fn test_distribution_defaults_to_first_candidate() {
        let ds = clinical_dataset();
        assert_eq!(
            feature_candidates(&ds),
            vec!["Glucose", AGE_COLUMN, PEDIGREE_COLUMN]
        );

        let Ok(ChartSpec::Distribution(dist)) =
            render(&ds, ChartKind::NumericDistribution, &ChartParams::default())
        else {
            panic!("expected distribution");
        };
        assert_eq!(dist.feature, "Glucose");
        assert_eq!(dist.title, "Distribution of Glucose");
        assert_eq!(dist.bins.len(), 20);
        assert!(approx(dist.bin_size, (183.0 - 85.0) / 20.0));
        let area: f64 = dist.bins.iter().map(|b| b.density * (b.end - b.start)).sum();
        assert!(approx(area, 1.0));
        assert_eq!(dist.density_curve.len(), 200);
    }

    #[test]
    fn test_box_plot_groups_by_label() {
        let ds = clinical_dataset();
        let Ok(ChartSpec::BoxPlot(chart)) = render(
            &ds,
            ChartKind::FeatureByOutcome,
            &ChartParams::with_feature(AGE_COLUMN),
        ) else {
            panic!("expected box plot");
        };

        assert_eq!(chart.title, "Age by Outcome");
        assert_eq!(chart.groups.len(), 2);
        assert_eq!(chart.groups[0].label, 0);
        assert_eq!(chart.groups[0].color, ChartColor::Green);
        assert!(approx(chart.groups[0].summary.median, 26.0));
        assert_eq!(chart.groups[1].label, 1);
        assert_eq!(chart.groups[1].color, ChartColor::Red);
        assert!(approx(chart.groups[1].summary.median, 41.0));
    }

    #[test]
    fn test_scatter_series_by_label() {
        let ds = clinical_dataset();
        let Ok(ChartSpec::Scatter(chart)) =
            render(&ds, ChartKind::AgeVsPedigree, &ChartParams::default())
        else {
            panic!("expected scatter");
        };

        assert_eq!(chart.x_title, "Age");
        assert_eq!(chart.y_title, "Diabetes Pedigree Function");
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].color, ChartColor::Green);
        assert_eq!(chart.series[0].points, vec![(31.0, 0.351), (21.0, 0.167)]);
        assert_eq!(chart.series[1].color, ChartColor::Red);
        assert_eq!(chart.series[1].points, vec![(50.0, 0.627), (32.0, 0.672)]);
    }

    #[test]
    fn test_scatter_requires_fixed_columns() {
        let ds = Dataset::new(vec![
            Column::categorical(AGE_COLUMN, ["young", "old"]),
            Column::numeric(PEDIGREE_COLUMN, [0.1, 0.2]),
        ])
        .expect("valid dataset");
        assert_eq!(
            render(&ds, ChartKind::AgeVsPedigree, &ChartParams::default()),
            Err(ChartError::NotNumeric(AGE_COLUMN.into()))
        );
    }

    #[test]
    fn test_summary_shape_and_head() {
        let ds = clinical_dataset();
        let settings = ChartSettings {
            head_rows: 2,
            ..ChartSettings::default()
        };
        let Ok(ChartSpec::Summary(view)) =
            render_chart(&ds, ChartKind::DatasetSummary, &ChartParams::default(), &settings)
        else {
            panic!("expected summary");
        };
        assert_eq!(view.shape, (4, 5));
        assert_eq!(view.head.len(), 2);
        assert_eq!(view.head[0][0], "Obesity");
        assert_eq!(view.statistics.len(), 5);
        assert_eq!(view.statistics[0].top.as_deref(), Some("Obesity"));
    }

    #[test]
    fn test_render_does_not_mutate_dataset() {
        let ds = clinical_dataset();
        let before = ds.clone();
        for kind in ChartKind::ALL {
            let _ = render(&ds, kind, &ChartParams::default());
        }
        assert_eq!(ds, before);
    }
}
