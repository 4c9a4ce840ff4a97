//! Tests for dry-run mode
//!
//! A dry run walks the listing and transforms every record, forms batches
//! exactly as a real run would, and never calls the destination.

use fauna::cli::commands::run::RunArgs;
use fauna::config::FaunaConfig;
use fauna::core::load::{partition, BatchStatus};
use fauna::core::pipeline::{Pipeline, RunOutcome, RunSummary};
use fauna::domain::{AnimalId, CanonicalRecord};
use mockito::Matcher;
use serde_json::json;
use tokio::sync::watch;

fn records(count: u64) -> Vec<CanonicalRecord> {
    (1..=count)
        .map(|id| {
            CanonicalRecord::builder()
                .id(AnimalId::new(id))
                .name(format!("Animal {id}"))
                .build()
                .unwrap()
        })
        .collect()
}

#[test]
fn test_dry_run_default_is_off() {
    let config = FaunaConfig::default();
    assert!(!config.application.dry_run);
}

#[test]
fn test_run_flag_enables_dry_run() {
    let mut config = FaunaConfig::default();
    let args = RunArgs {
        dry_run: true,
        ..RunArgs::default()
    };
    args.apply_overrides(&mut config);
    assert!(config.application.dry_run);

    // The flag never turns a configured dry run off
    let args = RunArgs::default();
    args.apply_overrides(&mut config);
    assert!(config.application.dry_run);
}

#[test]
fn test_dry_run_records_count_as_delivered() {
    let mut summary = RunSummary::new(true);
    summary.stats.transformed = 3;
    summary.load_report.add(fauna::core::load::BatchOutcome {
        index: 0,
        record_count: 3,
        record_ids: vec![AnimalId::new(1), AnimalId::new(2), AnimalId::new(3)],
        status: BatchStatus::DryRun,
        elapsed: std::time::Duration::from_millis(1),
    });

    assert_eq!(summary.records_delivered(), 3);
    assert_eq!(summary.stats.records_loaded, 0);
    assert_eq!(summary.success_ratio(), 1.0);
    assert_eq!(summary.outcome(1.0), RunOutcome::Success);
}

#[test]
fn test_dry_run_batches_match_real_partitioning() {
    let batches = partition(records(250), 100);
    let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
}

#[tokio::test]
async fn test_dry_run_pipeline_never_posts() {
    let mut server = mockito::Server::new_async().await;
    let _listing = server
        .mock("GET", "/animals/v1/animals")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(
            json!({"page": 1, "total_pages": 1, "items": [{"id": 1}, {"id": 2}, {"id": 3}]})
                .to_string(),
        )
        .create_async()
        .await;
    let _detail = server
        .mock(
            "GET",
            Matcher::Regex(r"^/animals/v1/animals/\d+$".to_string()),
        )
        .with_status(200)
        .with_body(json!({"id": 1, "name": "Otter", "friends": "Seal"}).to_string())
        .create_async()
        .await;
    let home = server
        .mock("POST", "/animals/v1/home")
        .expect(0)
        .create_async()
        .await;

    let mut config = FaunaConfig::default();
    config.source.base_url = server.url();
    config.application.dry_run = true;
    config.load.batch_size = 2;

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let pipeline = Pipeline::new(&config, shutdown_rx).unwrap();
    let summary = pipeline.run().await.unwrap();

    home.assert_async().await;
    assert!(summary.dry_run);
    assert_eq!(summary.stats.transformed, 3);
    assert_eq!(summary.stats.batches_sent, 0);
    assert_eq!(summary.stats.records_loaded, 0);
    assert_eq!(summary.load_report.total_batches(), 2);
    assert_eq!(summary.load_report.records_dry_run(), 3);
    assert!(summary
        .load_report
        .outcomes
        .iter()
        .all(|outcome| outcome.status == BatchStatus::DryRun));
    assert_eq!(summary.outcome(1.0), RunOutcome::Success);
}
