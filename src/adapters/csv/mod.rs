//! CSV adapter: Implementation of DatasetStore.
//!
//! Reads a headered CSV file into a column-oriented `Dataset`. Column kinds
//! are inferred: a column is numeric when every cell parses as a float,
//! categorical otherwise.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::{Column, Dataset, DatasetError};
use crate::ports::DatasetStore;

/// Error type for CSV dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum CsvStoreError {
    #[error("Failed to open dataset {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset file has no header row")]
    EmptyHeader,

    #[error("Dataset file has no data rows")]
    NoRows,

    #[error("Invalid dataset: {0}")]
    Dataset(#[from] DatasetError),
}

/// CSV-backed dataset store.
#[derive(Debug, Clone)]
pub struct CsvDatasetStore {
    path: PathBuf,
    delimiter: u8,
}

impl CsvDatasetStore {
    /// Create a store reading from `path`. `.tsv` files use tab delimiters.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        Self { path, delimiter }
    }

    /// Parse a dataset from any reader.
    ///
    /// # Errors
    /// Returns error on malformed CSV, missing cells, or invalid labels.
    pub fn read_from<R: Read>(reader: R, delimiter: u8) -> Result<Dataset, CsvStoreError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(CsvStoreError::EmptyHeader);
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for (col, header) in headers.iter().enumerate() {
                let cell = record.get(col).unwrap_or("");
                if is_missing(cell) {
                    return Err(DatasetError::MissingValue {
                        column: header.clone(),
                        row,
                    }
                    .into());
                }
                cells[col].push(cell.to_string());
            }
        }

        if cells.first().map_or(true, Vec::is_empty) {
            return Err(CsvStoreError::NoRows);
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| infer_column(name, raw))
            .collect();

        Ok(Dataset::new(columns)?)
    }
}

/// Empty cells and non-finite numbers (`NaN`, `inf`) count as missing.
fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell.parse::<f64>().is_ok_and(|x| !x.is_finite())
}

/// Numeric iff every cell parses as `f64`.
fn infer_column(name: String, raw: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = raw.iter().map(|s| s.parse::<f64>().ok()).collect();
    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::categorical(name, raw),
    }
}

impl DatasetStore for CsvDatasetStore {
    type Error = CsvStoreError;

    fn load_dataset(&self) -> Result<Dataset, Self::Error> {
        let file = std::fs::File::open(&self.path).map_err(|source| CsvStoreError::Open {
            path: self.path.clone(),
            source,
        })?;
        let dataset = Self::read_from(std::io::BufReader::new(file), self.delimiter)?;

        tracing::info!(
            "Loaded dataset from {:?} ({} rows, {} columns)",
            self.path,
            dataset.n_rows(),
            dataset.n_columns()
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnKind, LABEL_COLUMN};
    use tempfile::tempdir;

    const SAMPLE: &str = "\
Glucose,BloodPressure,BMI,Age,Outcome
148,Normal,Obesity,50,1
85,Stage1,Healthy Weight,31,0
183,Normal,Healthy Weight,32,1
";

    #[test]
    fn test_infers_column_kinds() {
        let ds = CsvDatasetStore::read_from(SAMPLE.as_bytes(), b',').expect("Should parse");
        assert_eq!(ds.n_rows(), 3);

        let kinds: Vec<_> = ds.columns().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Categorical,
                ColumnKind::Categorical,
                ColumnKind::Numeric,
                ColumnKind::Numeric,
            ]
        );
        assert_eq!(ds.labels(), Some(&[1.0, 0.0, 1.0][..]));
    }

    #[test]
    fn test_cells_are_trimmed() {
        let ds = CsvDatasetStore::read_from("a, b\n 1 , x \n".as_bytes(), b',')
            .expect("Should parse");
        assert_eq!(ds.column("a").and_then(|c| c.as_numeric()), Some(&[1.0][..]));
        assert_eq!(
            ds.column("b").and_then(|c| c.as_categorical()),
            Some(&["x".to_string()][..])
        );
    }

    #[test]
    fn test_missing_cell_is_an_error() {
        let err = CsvDatasetStore::read_from("a,b\n1,\n".as_bytes(), b',').unwrap_err();
        let CsvStoreError::Dataset(inner) = err else {
            panic!("expected a dataset error, got {err:?}");
        };
        assert_eq!(
            inner,
            DatasetError::MissingValue {
                column: "b".into(),
                row: 0
            }
        );
    }

    #[test]
    fn test_non_finite_cells_are_missing() {
        let input = "Glucose,Outcome\n120,1\nNaN,0\n85,0\n";
        let err = CsvDatasetStore::read_from(input.as_bytes(), b',').unwrap_err();
        let CsvStoreError::Dataset(inner) = err else {
            panic!("expected a dataset error, got {err:?}");
        };
        assert_eq!(
            inner,
            DatasetError::MissingValue {
                column: "Glucose".into(),
                row: 1
            }
        );

        for cell in ["inf", "-inf", "infinity"] {
            let input = format!("Insulin,Outcome\n{cell},0\n");
            let err = CsvDatasetStore::read_from(input.as_bytes(), b',').unwrap_err();
            assert!(
                matches!(err, CsvStoreError::Dataset(DatasetError::MissingValue { row: 0, .. })),
                "{cell}"
            );
        }
    }

    #[test]
    fn test_no_rows_is_an_error() {
        let err = CsvDatasetStore::read_from("a,b\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, CsvStoreError::NoRows));
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let input = format!("x,{LABEL_COLUMN}\n1,0\n2,3\n");
        let err = CsvDatasetStore::read_from(input.as_bytes(), b',').unwrap_err();
        assert!(matches!(
            err,
            CsvStoreError::Dataset(DatasetError::InvalidLabel(v)) if v == 3.0
        ));
    }

    #[test]
    fn test_load_from_file_and_tsv() {
        let temp = tempdir().expect("tempdir");
        let csv_path = temp.path().join("d.csv");
        std::fs::write(&csv_path, SAMPLE).expect("write csv");
        let ds = CsvDatasetStore::new(&csv_path)
            .load_dataset()
            .expect("Should load");
        assert_eq!(ds.n_columns(), 5);

        let tsv_path = temp.path().join("d.tsv");
        std::fs::write(&tsv_path, "a\tb\n1\t2\n").expect("write tsv");
        let ds = CsvDatasetStore::new(&tsv_path)
            .load_dataset()
            .expect("Should load");
        assert_eq!(ds.n_columns(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = CsvDatasetStore::new("/nonexistent/data.csv")
            .load_dataset()
            .unwrap_err();
        assert!(matches!(err, CsvStoreError::Open { .. }));
    }
}
