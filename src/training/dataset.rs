//! Dataset ingestion: CSV, JSON (matrix or records), Parquet, synthetic fallback
//!
//! Malformed rows (missing, non-numeric or non-finite cells) are skipped,
//! not reported as errors, as long as at least one valid row remains.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use nalgebra::{DMatrix, DVector};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::config::TrainingConfig;
use crate::{Error, Result};

/// Samples in the synthetic fallback dataset.
pub const SYNTHETIC_SAMPLES: usize = 512;

/// Features in the synthetic fallback dataset.
pub const SYNTHETIC_FEATURES: usize = 8;

/// Seed of the synthetic fallback dataset.
pub const SYNTHETIC_SEED: u64 = 42;

/// Noise standard deviation of the synthetic fallback dataset.
pub const SYNTHETIC_NOISE: f64 = 0.05;

/// Provenance of the synthetic fallback dataset.
pub const SYNTHETIC_SOURCE: &str = "synthetic:fallback";

/// Numeric training data with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: DMatrix<f64>,
    targets: Vec<f64>,
    feature_names: Vec<String>,
    source: String,
}

impl Dataset {
    /// Assemble a dataset, checking shape invariants.
    ///
    /// # Errors
    /// Returns `DatasetFormat` if row counts or name count disagree
    pub fn new(
        features: DMatrix<f64>,
        targets: Vec<f64>,
        feature_names: Vec<String>,
        source: impl Into<String>,
    ) -> Result<Self> {
        if features.nrows() != targets.len() {
            return Err(Error::DatasetFormat(format!(
                "{} feature rows but {} targets",
                features.nrows(),
                targets.len()
            )));
        }
        if features.ncols() != feature_names.len() {
            return Err(Error::DatasetFormat(format!(
                "{} feature columns but {} feature names",
                features.ncols(),
                feature_names.len()
            )));
        }
        Ok(Self {
            features,
            targets,
            feature_names,
            source: source.into(),
        })
    }

    /// Feature matrix (rows = samples).
    #[must_use]
    pub const fn features(&self) -> &DMatrix<f64> {
        &self.features
    }

    /// Target vector.
    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Provenance string, e.g. `csv:/data/runs.csv`.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Declared dataset format, from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// `.csv` with a header row.
    Csv,
    /// `.json`
    Json,
    /// `.parquet`
    Parquet,
}

impl DatasetFormat {
    /// Format for `path`, if recognized.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Load `path` by its extension. A missing file or an unrecognized
/// extension yields the synthetic dataset.
///
/// # Errors
/// Returns error if a recognized file cannot be parsed or has no valid rows
pub fn load_dataset(path: &Path, config: &TrainingConfig) -> Result<Dataset> {
    let format = if path.exists() {
        DatasetFormat::from_path(path)
    } else {
        None
    };
    let dataset = match format {
        Some(DatasetFormat::Csv) => load_csv(path, config)?,
        Some(DatasetFormat::Json) => load_json(path, config)?,
        Some(DatasetFormat::Parquet) => load_parquet(path, config)?,
        None => {
            warn!(path = %path.display(), "dataset missing or of unknown type; using synthetic fallback");
            synthetic_dataset()
        }
    };
    info!(
        source = dataset.source(),
        samples = dataset.n_samples(),
        features = dataset.n_features(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Pick the target (configured name, else last column) and the feature
/// columns (configured allow-list, else every other column).
fn resolve_columns(available: &[String], config: &TrainingConfig) -> Result<(String, Vec<String>)> {
    let last = available
        .last()
        .ok_or_else(|| Error::DatasetFormat("dataset has no columns".to_string()))?;
    let target = if available.contains(&config.target_column) {
        config.target_column.clone()
    } else {
        last.clone()
    };

    let features: Vec<String> = match config.feature_columns.as_deref() {
        Some(wanted) if !wanted.is_empty() => {
            let kept: Vec<String> = wanted
                .iter()
                .filter(|c| available.contains(c) && **c != target)
                .cloned()
                .collect();
            if kept.len() < wanted.len() {
                warn!(requested = wanted.len(), kept = kept.len(), "dropped unavailable feature columns");
            }
            kept
        }
        _ => available.iter().filter(|c| **c != target).cloned().collect(),
    };

    if features.is_empty() {
        return Err(Error::DatasetFormat("No feature columns found".to_string()));
    }
    Ok((target, features))
}

/// `Some(v)` only for finite values; `nan` and `inf` cells count as
/// malformed.
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn parse_cell(text: &str) -> Option<f64> {
    text.trim().parse().ok().and_then(finite)
}

/// Row-major rows into a matrix with `n_cols` columns.
fn rows_to_matrix(rows: &[Vec<f64>], n_cols: usize) -> Result<DMatrix<f64>> {
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(Error::DatasetFormat(format!(
            "row {i} has {} columns, expected {n_cols}",
            row.len()
        )));
    }
    Ok(DMatrix::from_fn(rows.len(), n_cols, |r, c| rows[r][c]))
}

fn finish(
    rows: Vec<Vec<f64>>,
    targets: Vec<f64>,
    feature_names: Vec<String>,
    source: String,
    skipped: usize,
) -> Result<Dataset> {
    if rows.is_empty() {
        return Err(Error::InsufficientData(format!("No valid numeric rows found in {source}")));
    }
    if skipped > 0 {
        debug!(skipped, source = %source, "skipped malformed rows");
    }
    let features = rows_to_matrix(&rows, feature_names.len())?;
    Dataset::new(features, targets, feature_names, source)
}

/// Load a CSV file with a header row.
///
/// # Errors
/// Returns `DatasetFormat` without a header or feature columns, and
/// `InsufficientData` if no row parses
pub fn load_csv(path: &Path, config: &TrainingConfig) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::DatasetFormat(format!("CSV missing header row: {}", path.display())));
    }

    let (target, features) = resolve_columns(&header, config)?;
    let position = |name: &str| header.iter().position(|h| h == name);
    let target_idx = position(target.as_str());
    let feature_idx: Vec<Option<usize>> = features.iter().map(|f| position(f.as_str())).collect();

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };
        let cell = |idx: Option<usize>| -> Option<f64> { parse_cell(record.get(idx?)?) };
        let parsed: Option<Vec<f64>> = feature_idx.iter().map(|&i| cell(i)).collect();
        match (parsed, cell(target_idx)) {
            (Some(row), Some(y)) => {
                rows.push(row);
                targets.push(y);
            }
            _ => skipped += 1,
        }
    }

    finish(rows, targets, features, format!("csv:{}", path.display()), skipped)
}

fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_cell(s),
        _ => None,
    }
}

/// Load a JSON dataset: either `{features: [[..]], targets: [..]}` or a
/// list of records (bare or under `records`).
///
/// # Errors
/// Returns `DatasetFormat` for other shapes and `InsufficientData` if no
/// record parses
pub fn load_json(path: &Path, config: &TrainingConfig) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&text)?;

    if let (Some(features), Some(targets)) = (payload.get("features"), payload.get("targets")) {
        return matrix_dataset(features, targets, format!("json:{}", path.display()));
    }

    let records: Vec<&Map<String, Value>> = match &payload {
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        Value::Object(obj) => match obj.get("records") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
            _ => {
                return Err(Error::DatasetFormat(
                    "JSON dataset must be either {'features': [...], 'targets': [...]} \
                     or a list of record objects"
                        .to_string(),
                ))
            }
        },
        _ => {
            return Err(Error::DatasetFormat(
                "JSON dataset must be an object or a list of record objects".to_string(),
            ))
        }
    };
    if records.is_empty() {
        return Err(Error::InsufficientData(format!(
            "No record objects found in JSON: {}",
            path.display()
        )));
    }

    // Union of keys, sorted, for a deterministic column order.
    let keys: Vec<String> = records
        .iter()
        .flat_map(|r| r.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let target = if keys.contains(&config.target_column) {
        config.target_column.clone()
    } else {
        keys.last().cloned().unwrap_or_default()
    };
    let features: Vec<String> = keys.iter().filter(|k| **k != target).cloned().collect();
    if features.is_empty() {
        return Err(Error::DatasetFormat("No feature columns found".to_string()));
    }

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    let mut skipped = 0usize;
    for record in &records {
        let parsed: Option<Vec<f64>> = features.iter().map(|k| record.get(k).and_then(coerce)).collect();
        match (parsed, record.get(&target).and_then(coerce)) {
            (Some(row), Some(y)) => {
                rows.push(row);
                targets.push(y);
            }
            _ => skipped += 1,
        }
    }

    finish(rows, targets, features, format!("json-records:{}", path.display()), skipped)
}

fn matrix_dataset(features: &Value, targets: &Value, source: String) -> Result<Dataset> {
    let bad = |what: &str| Error::DatasetFormat(format!("{what} in {source}"));
    let numeric = |cell: &Value| cell.as_f64().and_then(finite);

    let rows: Vec<Vec<f64>> = features
        .as_array()
        .ok_or_else(|| bad("'features' must be a 2-D numeric array"))?
        .iter()
        .map(|row| {
            row.as_array()
                .and_then(|cells| cells.iter().map(numeric).collect::<Option<Vec<f64>>>())
        })
        .collect::<Option<_>>()
        .ok_or_else(|| bad("'features' must be a 2-D numeric array"))?;
    let targets: Vec<f64> = targets
        .as_array()
        .and_then(|cells| cells.iter().map(numeric).collect::<Option<Vec<f64>>>())
        .ok_or_else(|| bad("'targets' must be a numeric array"))?;

    if rows.is_empty() {
        return Err(Error::InsufficientData(format!("No samples in {source}")));
    }
    let matrix = rows_to_matrix(&rows, rows[0].len())?;
    let names = (0..matrix.ncols()).map(|i| format!("x{i}")).collect();
    Dataset::new(matrix, targets, names, source)
}

fn float_column(batch: &arrow::record_batch::RecordBatch, name: &str) -> Result<Option<Float64Array>> {
    let Some(column) = batch.column_by_name(name) else {
        return Ok(None);
    };
    let casted = cast(column, &DataType::Float64)?;
    Ok(casted.as_any().downcast_ref::<Float64Array>().cloned())
}

/// Load a Parquet file; columns are cast to `f64`, rows with null,
/// non-castable or non-finite cells are skipped.
///
/// # Errors
/// Returns error if the file cannot be read, has no feature columns, or no
/// row is complete
pub fn load_parquet(path: &Path, config: &TrainingConfig) -> Result<Dataset> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let available: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let (target, features) = resolve_columns(&available, config)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    let mut skipped = 0usize;
    for batch in reader {
        let batch = batch?;
        let Some(y) = float_column(&batch, &target)? else {
            skipped += batch.num_rows();
            continue;
        };
        let columns: Vec<Float64Array> = features
            .iter()
            .map(|f| float_column(&batch, f))
            .collect::<Result<Option<Vec<_>>>>()?
            .ok_or_else(|| Error::DatasetFormat(format!("feature column missing from batch in {}", path.display())))?;

        for i in 0..batch.num_rows() {
            let cell = |c: &Float64Array| if c.is_null(i) { None } else { finite(c.value(i)) };
            match (columns.iter().map(cell).collect::<Option<Vec<f64>>>(), cell(&y)) {
                (Some(row), Some(target)) => {
                    rows.push(row);
                    targets.push(target);
                }
                _ => skipped += 1,
            }
        }
    }

    finish(rows, targets, features, format!("parquet:{}", path.display()), skipped)
}

/// Fixed-seed synthetic dataset: 512 samples of 8 standard-normal features,
/// linear ground truth with weights evenly spaced over `[0.5, 2.0]`, plus
/// Gaussian noise (σ = 0.05).
#[must_use]
pub fn synthetic_dataset() -> Dataset {
    let mut rng = StdRng::seed_from_u64(SYNTHETIC_SEED);

    #[allow(clippy::cast_precision_loss)]
    let weights: Vec<f64> = (0..SYNTHETIC_FEATURES)
        .map(|i| 0.5 + 1.5 * i as f64 / (SYNTHETIC_FEATURES - 1) as f64)
        .collect();

    // row-major draw order
    let cells: Vec<f64> = (0..SYNTHETIC_SAMPLES * SYNTHETIC_FEATURES)
        .map(|_| StandardNormal.sample(&mut rng))
        .collect();
    let matrix = DMatrix::from_row_slice(SYNTHETIC_SAMPLES, SYNTHETIC_FEATURES, &cells);
    let targets: Vec<f64> = (&matrix * DVector::from_vec(weights))
        .iter()
        .map(|&y| {
            let z: f64 = StandardNormal.sample(&mut rng);
            SYNTHETIC_NOISE.mul_add(z, y)
        })
        .collect();
    let names = (0..SYNTHETIC_FEATURES).map(|i| format!("x{i}")).collect();

    Dataset {
        features: matrix,
        targets,
        feature_names: names,
        source: SYNTHETIC_SOURCE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn row(ds: &Dataset, i: usize) -> Vec<f64> {
        ds.features().row(i).iter().copied().collect()
    }

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_csv_skips_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,b,target\n1,2,3\n4,x,6\n7,8,\n 9 ,10,11\n");

        let ds = load_csv(&path, &TrainingConfig::default()).unwrap();

        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.feature_names(), &["a", "b"]);
        assert_eq!(ds.targets(), &[3.0, 11.0]);
        assert_eq!(row(&ds, 1), [9.0, 10.0]);
        assert!(ds.source().starts_with("csv:"));
    }

    #[test]
    fn test_csv_target_falls_back_to_last_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "p,stress\n1,2\n");
        let ds = load_csv(&path, &TrainingConfig::default()).unwrap();
        assert_eq!(ds.feature_names(), &["p"]);
        assert_eq!(ds.targets(), &[2.0]);
    }

    #[test]
    fn test_csv_feature_allow_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,b,c,target\n1,2,3,4\n");
        let config = TrainingConfig {
            feature_columns: Some(vec!["c".into(), "nope".into(), "target".into(), "a".into()]),
            ..TrainingConfig::default()
        };
        let ds = load_csv(&path, &config).unwrap();
        assert_eq!(ds.feature_names(), &["c", "a"]);
        assert_eq!(row(&ds, 0), [3.0, 1.0]);
    }

    #[test]
    fn test_csv_all_rows_bad() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,target\nx,y\n");
        assert!(matches!(
            load_csv(&path, &TrainingConfig::default()),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_csv_no_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "target\n1\n");
        assert!(matches!(
            load_csv(&path, &TrainingConfig::default()),
            Err(Error::DatasetFormat(_))
        ));
    }

    #[test]
    fn test_json_matrix_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.json", r#"{"features": [[1, 2], [3, 4]], "targets": [5, 6]}"#);
        let ds = load_json(&path, &TrainingConfig::default()).unwrap();
        assert_eq!(ds.feature_names(), &["x0", "x1"]);
        assert_eq!(ds.n_samples(), 2);
        assert!(ds.source().starts_with("json:"));
    }

    #[test]
    fn test_json_matrix_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.json", r#"{"features": [[1, 2], [3, 4]], "targets": [5]}"#);
        assert!(matches!(
            load_json(&path, &TrainingConfig::default()),
            Err(Error::DatasetFormat(_))
        ));
    }

    #[test]
    fn test_json_records_sorted_keys_and_coercion() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "d.json",
            r#"{"records": [
                {"z": 1, "a": "2.5", "target": 3},
                {"z": 4, "a": null, "target": 6},
                {"z": true, "a": 7, "target": 8},
                "not a record"
            ]}"#,
        );
        let ds = load_json(&path, &TrainingConfig::default()).unwrap();

        assert_eq!(ds.feature_names(), &["a", "z"]);
        assert_eq!(ds.n_samples(), 2);
        assert_eq!(row(&ds, 0), [2.5, 1.0]);
        assert_eq!(row(&ds, 1), [7.0, 1.0]);
        assert!(ds.source().starts_with("json-records:"));
    }

    #[test]
    fn test_json_other_shape_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "d.json", r#"{"rows": []}"#);
        assert!(matches!(
            load_json(&path, &TrainingConfig::default()),
            Err(Error::DatasetFormat(_))
        ));
    }

    #[test]
    fn test_parquet_roundtrip_with_nulls() {
        use arrow::array::{ArrayRef, Int64Array};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("p", DataType::Int64, true),
            Field::new("target", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])) as ArrayRef,
                Arc::new(Float64Array::from(vec![Some(2.0), Some(4.0), Some(6.0)])) as ArrayRef,
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_dataset(&path, &TrainingConfig::default()).unwrap();

        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.feature_names(), &["p"]);
        assert_eq!(ds.targets(), &[2.0, 6.0]);
        assert_eq!(row(&ds, 1), [3.0]);
    }

    #[test]
    fn test_missing_or_unknown_falls_back_to_synthetic() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_dataset(&dir.path().join("absent.csv"), &TrainingConfig::default()).unwrap();
        let unknown = write(dir.path(), "data.txt", "whatever");
        let other = load_dataset(&unknown, &TrainingConfig::default()).unwrap();

        assert_eq!(missing.source(), SYNTHETIC_SOURCE);
        assert_eq!(other.source(), SYNTHETIC_SOURCE);
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let a = synthetic_dataset();
        let b = synthetic_dataset();
        assert_eq!(a, b);
        assert_eq!(a.n_samples(), SYNTHETIC_SAMPLES);
        assert_eq!(a.n_features(), SYNTHETIC_FEATURES);
        assert_eq!(a.feature_names()[7], "x7");
    }

    #[test]
    fn test_csv_skips_non_finite_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "d.csv",
            "a,target\n1,2\nnan,4\n5,inf\n-Infinity,7\n8,NaN\n9,10\n",
        );

        let ds = load_csv(&path, &TrainingConfig::default()).unwrap();

        assert_eq!(ds.targets(), &[2.0, 10.0]);
        assert!(ds.features().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_json_non_finite_strings_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "d.json",
            r#"[{"a": 1, "target": 2}, {"a": "nan", "target": 3}, {"a": 4, "target": "inf"}, {"a": 5, "target": 6}]"#,
        );
        let ds = load_json(&path, &TrainingConfig::default()).unwrap();
        assert_eq!(ds.targets(), &[2.0, 6.0]);
    }

    #[test]
    fn test_snappy_parquet_loads_and_skips_nan() {
        use arrow::array::ArrayRef;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;
        use parquet::basic::Compression;
        use parquet::file::properties::WriterProperties;
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snappy.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("p", DataType::Float64, false),
            Field::new("target", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![1.0, 2.0, f64::NAN, 4.0])) as ArrayRef,
                Arc::new(Float64Array::from(vec![3.0, f64::INFINITY, 7.0, 9.0])) as ArrayRef,
            ],
        )
        .unwrap();
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, Some(props)).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_dataset(&path, &TrainingConfig::default()).unwrap();

        assert!(ds.source().starts_with("parquet:"));
        assert_eq!(ds.targets(), &[3.0, 9.0]);
        assert_eq!(row(&ds, 1), [4.0]);
    }
}
