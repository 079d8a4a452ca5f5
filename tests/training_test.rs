//! Surrogate training tests: ridge recovery, ingestion, full pipeline runs

use std::fmt::Write as _;
use std::path::Path;

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use surrogate_pipeline::fsio::load_json;
use surrogate_pipeline::gates::{check_surrogate_metrics, GateThresholds, SurrogateMetrics};
use surrogate_pipeline::training::{
    fit_ridge, load_dataset, run_training, train, Dataset, RegressionMetrics, TrainingConfig,
    CHECKPOINT_ARTIFACT, METRICS_ARTIFACT, REPORT_ARTIFACT, SYNTHETIC_SOURCE,
};
use surrogate_pipeline::Error;

const COEFFICIENTS: [f64; 3] = [1.5, -2.0, 0.5];
const BIAS: f64 = 3.0;

fn noiseless_dataset(n: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(7);
    let cells: Vec<f64> = (0..n * COEFFICIENTS.len()).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let x = DMatrix::from_row_slice(n, COEFFICIENTS.len(), &cells);
    let targets = x
        .row_iter()
        .map(|row| row.iter().zip(COEFFICIENTS).map(|(x, w)| x * w).sum::<f64>() + BIAS)
        .collect();
    let names = (0..COEFFICIENTS.len()).map(|i| format!("x{i}")).collect();
    Dataset::new(x, targets, names, "test:noiseless").unwrap()
}

fn write_input(dir: &Path, payload: &Value) -> std::path::PathBuf {
    let path = dir.join("input.json");
    std::fs::write(&path, payload.to_string()).unwrap();
    path
}

fn write_linear_csv(path: &Path, rows: usize) {
    let mut body = String::from("a,b,target\n");
    for i in 0..rows {
        let a = i as f64;
        let b = ((i * i) % 7) as f64;
        let _ = writeln!(body, "{a},{b},{}", 2.0 * a - b + 1.0);
    }
    std::fs::write(path, body).unwrap();
}

// =============================================================================
// Ridge recovery
// =============================================================================

#[test]
fn test_zero_noise_recovers_coefficients() {
    let dataset = noiseless_dataset(COEFFICIENTS.len() + 2 + 10);

    let weights = fit_ridge(dataset.features(), dataset.targets(), 0.0).unwrap();

    for (w, expected) in weights.iter().zip(COEFFICIENTS) {
        assert!((w - expected).abs() < 1e-8, "weight {w} vs {expected}");
    }
    assert!((weights[3] - BIAS).abs() < 1e-8);
}

#[test]
fn test_zero_noise_scores_perfectly_on_both_splits() {
    let dataset = noiseless_dataset(40);
    let config = TrainingConfig {
        ridge_lambda: 0.0,
        ..TrainingConfig::default()
    };

    let fit = train(&dataset, &config).unwrap();

    for m in [fit.train_metrics, fit.val_metrics] {
        assert!(m.mse < 1e-12, "mse {}", m.mse);
        assert!((m.r2 - 1.0).abs() < 1e-10, "r2 {}", m.r2);
    }
    assert!(fit.val_normalized_mae < 1e-8);
}

#[test]
fn test_metrics_match_prediction() {
    let dataset = noiseless_dataset(30);
    let fit = train(&dataset, &TrainingConfig::default()).unwrap();
    let predicted = fit.model.predict(dataset.features());
    let all = RegressionMetrics::compute(dataset.targets(), &predicted);
    assert!(all.r2 > 0.999_999);
}

#[test]
fn test_too_few_samples() {
    let dataset = noiseless_dataset(4);
    assert!(matches!(
        train(&dataset, &TrainingConfig::default()),
        Err(Error::InsufficientData(_))
    ));
}

#[test]
fn test_unknown_backend_not_substituted() {
    let dataset = noiseless_dataset(10);
    let config = TrainingConfig {
        backend: "gradient_boosting".into(),
        ..TrainingConfig::default()
    };
    assert!(matches!(train(&dataset, &config), Err(Error::UnsupportedBackend(_))));
}

// =============================================================================
// Pipeline runs
// =============================================================================

#[test]
fn test_csv_pipeline_writes_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write_linear_csv(&dir.path().join("data.csv"), 30);
    let input = write_input(
        dir.path(),
        &json!({
            "campaign_root_model": {"value": "data.csv"},
            "dataset_job_id": {"value": "job-7"},
            "training_config": "{\"ridge_lambda\": 0, \"notes\": \"smoke\"}"
        }),
    );
    let output = dir.path().join("output.json");
    let temp = dir.path().join("work");

    let run = run_training(&input, &output, &temp).unwrap();

    assert!(run.record.dataset_source.starts_with("csv:"));
    assert_eq!(run.record.samples, 30);
    assert_eq!(run.record.features, 2);
    assert_eq!(run.record.feature_names, ["a", "b"]);
    assert_eq!(run.record.dataset_job_id, "job-7");
    assert!(run.record.val_r2 > 0.999_999);
    assert_eq!(run.record.training_config.extra["notes"], "smoke");

    let listed: Vec<Value> = load_json(&output).unwrap();
    let names: Vec<&str> = listed.iter().filter_map(|a| a["name"].as_str()).collect();
    assert_eq!(names, [METRICS_ARTIFACT, CHECKPOINT_ARTIFACT, REPORT_ARTIFACT]);
    for artifact in &listed {
        assert!(artifact["cas_hash"].as_str().unwrap().starts_with("sha256:"));
        assert!(Path::new(artifact["path"].as_str().unwrap()).exists());
        assert!(artifact["size_bytes"].as_u64().unwrap() > 0);
    }

    let report = std::fs::read_to_string(temp.join("training_report.md")).unwrap();
    assert!(report.contains("- Dataset job id: `job-7`"));
    let checkpoint: Value = load_json(temp.join("model_checkpoint.json")).unwrap();
    assert_eq!(checkpoint["weights"].as_array().unwrap().len(), 3);
}

#[test]
fn test_metrics_document_feeds_quality_gates() {
    let dir = tempfile::tempdir().unwrap();
    write_linear_csv(&dir.path().join("data.csv"), 25);
    let input = write_input(dir.path(), &json!({"campaign_root_model": "data.csv"}));
    let temp = dir.path().join("work");

    run_training(&input, &dir.path().join("out.json"), &temp).unwrap();

    let metrics: SurrogateMetrics = load_json(temp.join("metrics.json")).unwrap();
    let results = check_surrogate_metrics(&metrics, &GateThresholds::default());
    assert!(results.iter().all(|r| r.passed()), "{results:?}");
}

#[test]
fn test_json_records_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<Value> = (0..12)
        .map(|i| {
            let p = f64::from(i);
            json!({"pressure": p, "thickness": 1.0 + (p * 0.37).sin(), "stress": 4.0 * p + 1.0})
        })
        .collect();
    std::fs::write(dir.path().join("runs.json"), json!({ "records": records }).to_string()).unwrap();
    let input = write_input(
        dir.path(),
        &json!({"campaign_root_model": "runs.json", "training_config": {"target_column": "stress"}}),
    );

    let run = run_training(&input, &dir.path().join("out.json"), &dir.path().join("work")).unwrap();

    assert!(run.record.dataset_source.starts_with("json-records:"));
    assert_eq!(run.record.feature_names, ["pressure", "thickness"]);
    assert!(run.record.val_r2 > 0.9999);
}

#[test]
fn test_missing_dataset_uses_synthetic_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("not_there.csv");
    let input = write_input(dir.path(), &json!({"campaign_root_model": absent.to_string_lossy()}));

    let run = run_training(&input, &dir.path().join("out.json"), &dir.path().join("work")).unwrap();

    assert_eq!(run.record.dataset_source, SYNTHETIC_SOURCE);
    assert_eq!(run.record.samples, 512);
    assert_eq!(run.record.features, 8);
    assert!(run.record.val_r2 > 0.99);
}

#[test]
fn test_too_small_csv_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_linear_csv(&dir.path().join("data.csv"), 4);
    let input = write_input(dir.path(), &json!({"campaign_root_model": "data.csv"}));

    let err = run_training(&input, &dir.path().join("out.json"), &dir.path().join("work")).unwrap_err();

    assert!(matches!(err, Error::InsufficientData(_)));
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn test_dataset_dispatch_ignores_extension_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DATA.CSV");
    write_linear_csv(&path, 6);
    let dataset = load_dataset(&path, &TrainingConfig::default()).unwrap();
    assert_eq!(dataset.n_samples(), 6);
}

#[test]
fn test_non_finite_rows_do_not_poison_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    write_linear_csv(&path, 20);
    let mut body = std::fs::read_to_string(&path).unwrap();
    body.push_str("3,nan,4\n5,1,inf\n");
    std::fs::write(&path, body).unwrap();
    let input = write_input(dir.path(), &json!({"campaign_root_model": "data.csv"}));
    let temp = dir.path().join("work");

    let run = run_training(&input, &dir.path().join("out.json"), &temp).unwrap();

    assert_eq!(run.record.samples, 20);
    assert!(run.record.val_r2.is_finite());
    assert!(run.record.val_normalized_mae.is_finite());
    let metrics: SurrogateMetrics = load_json(temp.join("metrics.json")).unwrap();
    assert!(check_surrogate_metrics(&metrics, &GateThresholds::default())
        .iter()
        .all(|r| r.passed()));
}
