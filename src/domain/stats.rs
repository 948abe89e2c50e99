//! Descriptive statistics over dataset columns.
//!
//! Conventions follow the usual data-frame defaults: sample standard
//! deviation (ddof = 1) and linearly interpolated quantiles.

use std::collections::HashMap;

use serde::Serialize;

use super::dataset::{Column, ColumnValues};

/// Summary of one column, numeric or categorical fields filled as applicable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    // Categorical
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    // Numeric
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Five-number box summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[must_use]
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation (ddof = 1).
#[must_use]
pub fn std_dev(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    Some(var.sqrt())
}

/// Quantile of already sorted data with linear interpolation.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_copy(xs: &[f64]) -> Vec<f64> {
    let mut v = xs.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Describe a single column.
#[must_use]
pub fn describe_column(column: &Column) -> ColumnSummary {
    let mut summary = ColumnSummary {
        name: column.name.clone(),
        count: column.values.len(),
        unique: None,
        top: None,
        freq: None,
        mean: None,
        std: None,
        min: None,
        q25: None,
        median: None,
        q75: None,
        max: None,
    };

    match &column.values {
        ColumnValues::Numeric(xs) => {
            let sorted = sorted_copy(xs);
            summary.mean = mean(xs);
            summary.std = std_dev(xs);
            summary.min = sorted.first().copied();
            summary.q25 = quantile_sorted(&sorted, 0.25);
            summary.median = quantile_sorted(&sorted, 0.5);
            summary.q75 = quantile_sorted(&sorted, 0.75);
            summary.max = sorted.last().copied();
        }
        ColumnValues::Categorical(values) => {
            // Ties resolve to the value seen first.
            let mut counts: HashMap<&str, usize> = HashMap::new();
            let mut order: Vec<&str> = Vec::new();
            for v in values {
                let entry = counts.entry(v.as_str()).or_insert(0);
                if *entry == 0 {
                    order.push(v.as_str());
                }
                *entry += 1;
            }
            let mut top: Option<(&str, usize)> = None;
            for &name in &order {
                let c = counts[name];
                if top.map_or(true, |(_, best)| c > best) {
                    top = Some((name, c));
                }
            }
            summary.unique = Some(order.len());
            summary.top = top.map(|(name, _)| name.to_string());
            summary.freq = top.map(|(_, c)| c);
        }
    }

    summary
}

/// Describe every column, in order.
#[must_use]
pub fn describe(columns: &[Column]) -> Vec<ColumnSummary> {
    columns.iter().map(describe_column).collect()
}

/// Pearson correlation; `None` when either side has zero variance.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Histogram bin with probability density height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    pub density: f64,
}

/// Probability-density histogram with `bins` equal-width bins spanning
/// `[min, max]`. A constant column gets a single unit-width bin.
#[must_use]
pub fn density_histogram(xs: &[f64], bins: usize) -> Vec<HistogramBin> {
    if xs.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (n_bins, width) = if max > min {
        (bins, (max - min) / bins as f64)
    } else {
        (1, 1.0)
    };

    let mut counts = vec![0usize; n_bins];
    for &x in xs {
        let idx = ((x - min) / width).floor() as usize;
        counts[idx.min(n_bins - 1)] += 1;
    }

    let total = xs.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count,
            density: count as f64 / (total * width),
        })
        .collect()
}

/// Gaussian kernel density estimate sampled at `points` evenly spaced
/// positions over the data range. Bandwidth follows Scott's rule.
/// Returns an empty curve when the bandwidth is degenerate.
#[must_use]
pub fn gaussian_kde(xs: &[f64], points: usize) -> Vec<(f64, f64)> {
    let Some(sd) = std_dev(xs) else {
        return Vec::new();
    };
    if sd == 0.0 || points < 2 {
        return Vec::new();
    }
    let n = xs.len() as f64;
    let h = sd * n.powf(-0.2);
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (n * h * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = min + step * i as f64;
            let density = xs
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / h).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}

/// Box summary of a sample; `None` when the sample is empty.
#[must_use]
pub fn box_summary(xs: &[f64]) -> Option<BoxSummary> {
    let sorted = sorted_copy(xs);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|x| *x >= lo_fence && *x <= hi_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|x| *x < lo_fence || *x > hi_fence)
        .collect();

    Some(BoxSummary {
        count: sorted.len(),
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}
