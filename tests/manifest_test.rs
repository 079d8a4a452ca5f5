//! Manifest lifecycle tests: submit, persist, poll, resume

use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;
use surrogate_pipeline::campaign::{generate_cases, CampaignSpec};
use surrogate_pipeline::manifest::{
    Manifest, ManifestRow, PollOptions, PollOutcome, Poller, ResumePolicy, SubmitOptions, Submitter,
};
use surrogate_pipeline::registry::MemoryJobService;
use surrogate_pipeline::status::{is_terminal, FAILURE_STATES, SUCCESS_STATES};

fn campaign(n: usize) -> CampaignSpec {
    let pressures: Vec<f64> = (1..=n).map(|i| i as f64 * 1e5).collect();
    CampaignSpec::from_json(
        &json!({
            "grid": {"pressure_pa": pressures, "poisson_ratio": [0.3], "youngs_modulus": [2.1e11]},
            "campaign_root_model_id": "root-1",
            "campaign_name": "lifecycle"
        })
        .to_string(),
    )
    .unwrap()
}

fn no_throttle() -> SubmitOptions {
    SubmitOptions {
        throttle: Duration::ZERO,
        checkpoint_every: 2,
        ..SubmitOptions::default()
    }
}

fn no_sleep() -> PollOptions {
    PollOptions {
        interval: Duration::ZERO,
        max_rounds: Some(50),
    }
}

// =============================================================================
// Submit then poll
// =============================================================================

#[test]
fn test_submit_then_poll_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let submitted_path = dir.path().join("campaign_jobs.json");
    let updated_path = dir.path().join("campaign_jobs.updated.json");
    let spec = campaign(5);
    let cases = generate_cases(&spec).unwrap();
    let service = MemoryJobService::new().with_script(&["Running", "COMPLETED"]);

    Submitter::new(&service, no_throttle())
        .run(&spec, &cases, &submitted_path, None)
        .unwrap();
    service.script_job("job-000004", &["running", "Timed_Out"]);

    let mut manifest = Manifest::load(&submitted_path).unwrap();
    assert!(manifest.rows().iter().all(|r| r.status == "submitted"));

    let outcome = Poller::new(&service, no_sleep()).run(&mut manifest, &updated_path).unwrap();

    let PollOutcome::Complete(last) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!((last.done, last.total), (5, 5));
    assert_eq!(last.progress_line(), "Progress 5/5 | completed=4, timed_out=1");
    assert_eq!(Manifest::load(&updated_path).unwrap(), manifest);
}

#[test]
fn test_resume_from_persisted_manifest_skips_terminal_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.json");
    let service = MemoryJobService::new().with_script(&["running"]);
    let spec = campaign(3);
    let cases = generate_cases(&spec).unwrap();
    Submitter::new(&service, no_throttle()).run(&spec, &cases, &path, None).unwrap();

    // first session gives up early
    let mut first = Manifest::load(&path).unwrap();
    service.set_status("job-000001", "succeeded");
    let outcome = Poller::new(&service, PollOptions { interval: Duration::ZERO, max_rounds: Some(1) })
        .run(&mut first, &path)
        .unwrap();
    assert!(matches!(outcome, PollOutcome::Exhausted(_)));
    let queries_before = service.query_count("job-000001");

    // second session picks up the persisted file
    service.set_status("job-000002", "failed");
    service.set_status("job-000003", "done");
    let mut second = Manifest::load(&path).unwrap();
    let outcome = Poller::new(&service, no_sleep()).run(&mut second, &path).unwrap();

    assert!(matches!(outcome, PollOutcome::Complete(_)));
    assert_eq!(service.query_count("job-000001"), queries_before);
    assert_eq!(second.histogram()["succeeded"], 1);
}

#[test]
fn test_skip_recorded_resubmits_only_missing_cases() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.json");
    let spec = campaign(5);
    let cases = generate_cases(&spec).unwrap();

    let flaky = MemoryJobService::new().with_submit_limit(3);
    assert!(Submitter::new(&flaky, no_throttle()).run(&spec, &cases, &path, None).is_err());
    let partial = Manifest::load(&path).unwrap();
    assert_eq!(partial.len(), 3);

    let healthy = MemoryJobService::new();
    let options = SubmitOptions {
        resume: ResumePolicy::SkipRecorded,
        ..no_throttle()
    };
    let manifest = Submitter::new(&healthy, options)
        .run(&spec, &cases, &path, Some(&partial))
        .unwrap();

    assert_eq!(healthy.len(), 2);
    assert_eq!(manifest.len(), 5);
    assert_eq!(manifest.rows()[0], partial.rows()[0]);
    let resubmitted: Vec<String> = healthy
        .submissions()
        .iter()
        .map(|r| r.parameters["case_id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(resubmitted, ["case_00004", "case_00005"]);
}

#[test]
fn test_always_submit_ignores_previous_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.json");
    let spec = campaign(2);
    let cases = generate_cases(&spec).unwrap();
    let service = MemoryJobService::new();

    let first = Submitter::new(&service, no_throttle()).run(&spec, &cases, &path, None).unwrap();
    Submitter::new(&service, no_throttle())
        .run(&spec, &cases, &path, Some(&first))
        .unwrap();

    assert_eq!(service.len(), 4);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_manifest_round_trips_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.json");
    let spec = campaign(1);
    let cases = generate_cases(&spec).unwrap();
    let service = MemoryJobService::new();

    let preview = Submitter::new(
        &service,
        SubmitOptions {
            dry_run: true,
            ..no_throttle()
        },
    )
    .run(&spec, &cases, &path, None)
    .unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["job_id"], serde_json::Value::Null);
    assert_eq!(raw[0]["status"], "dry_run");
    assert_eq!(raw[0]["parameters"]["campaign_id"], "lifecycle");
    assert_eq!(Manifest::load(&path).unwrap(), preview);
}

#[test]
fn test_no_temp_files_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.json");
    let spec = campaign(4);
    let cases = generate_cases(&spec).unwrap();

    Submitter::new(&MemoryJobService::new(), no_throttle())
        .run(&spec, &cases, &path, None)
        .unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["m.json"]);
}

// =============================================================================
// Properties
// =============================================================================

fn arb_status() -> impl Strategy<Value = String> {
    let mut tokens: Vec<&'static str> = SUCCESS_STATES.iter().chain(FAILURE_STATES).copied().collect();
    tokens.extend(["queued", "running", "submitted", "unknown"]);
    proptest::sample::select(tokens).prop_map(str::to_string)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_terminal_rows_never_change(
        initial in proptest::collection::vec(arb_status(), 1..12),
        reported in arb_status(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let service = MemoryJobService::new();
        let rows: Vec<ManifestRow> = initial
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let job = surrogate_pipeline::registry::JobService::submit(
                    &service,
                    &surrogate_pipeline::registry::JobRequest::new("m", "f", serde_json::Value::Null),
                )
                .unwrap();
                service.set_status(&job.id, &reported);
                let mut row = ManifestRow::submitted(format!("case_{:05}", i + 1), job.id);
                row.status.clone_from(status);
                row
            })
            .collect();
        let mut manifest = Manifest::from_rows(rows);

        let options = PollOptions { interval: Duration::ZERO, max_rounds: Some(3) };
        let outcome = Poller::new(&service, options).run(&mut manifest, &dir.path().join("m.json")).unwrap();

        for (row, before) in manifest.rows().iter().zip(&initial) {
            if is_terminal(before) {
                prop_assert_eq!(&row.status, before);
            } else {
                prop_assert_eq!(&row.status, &reported);
            }
        }
        let all_terminal = manifest.rows().iter().all(|r| is_terminal(&r.status));
        prop_assert_eq!(matches!(outcome, PollOutcome::Complete(_)), all_terminal);
    }
}
