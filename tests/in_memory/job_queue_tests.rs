//! Job queue integration tests through the platform.

use std::sync::Arc;

use super::helpers::{payload, test_platform, wait_for_terminal};
use camino::Utf8PathBuf;
use gitvibe_orchestrator::audit::adapters::InMemoryAuditLog;
use gitvibe_orchestrator::config::OrchestratorConfig;
use gitvibe_orchestrator::context::Payload;
use gitvibe_orchestrator::job_queue::domain::JobStatus;
use gitvibe_orchestrator::job_queue::ports::{JobHandlerError, handler_fn};
use gitvibe_orchestrator::job_queue::services::STATE_KEY;
use gitvibe_orchestrator::platform::Platform;
use gitvibe_orchestrator::storage::adapters::JsonFileKeyValueStore;
use gitvibe_orchestrator::storage::ports::KeyValueStore;
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn enqueued_job_is_processed_and_audited() {
    let harness = test_platform(OrchestratorConfig::default()).await;
    harness.platform.register_job_handler(
        "ai_review",
        handler_fn(|input: Payload| async move {
            let mut out = Payload::new();
            out.insert("reviewed".to_owned(), input.get("pr").cloned().unwrap_or_default());
            Ok(out)
        }),
    );

    let job = harness
        .platform
        .enqueue_job("ai_review", payload(json!({"pr": 12})), 1)
        .await
        .expect("enqueue should succeed");
    assert_eq!(job.status, JobStatus::Queued);

    let processed = harness
        .platform
        .jobs()
        .process_next()
        .await
        .expect("pass should persist")
        .expect("a job should be dispatched");
    assert_eq!(processed.id, job.id);
    assert_eq!(processed.status, JobStatus::Completed);
    assert_eq!(processed.result, Some(payload(json!({"reviewed": 12}))));
    assert_eq!(
        harness.audit.events(),
        vec!["job_enqueued", "job_started", "job_completed"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn background_worker_drains_the_queue_and_stops() {
    let harness = test_platform(OrchestratorConfig::default()).await;
    harness.platform.register_job_handler(
        "echo",
        handler_fn(|input: Payload| async move { Ok(input) }),
    );
    harness.platform.register_job_handler(
        "broken",
        handler_fn(|_input: Payload| async move { Err(JobHandlerError::new("always fails")) }),
    );
    let ok = harness
        .platform
        .enqueue_job("echo", payload(json!({"n": 1})), 0)
        .await
        .expect("enqueue echo");
    let bad = harness
        .platform
        .enqueue_job("broken", Payload::new(), 0)
        .await
        .expect("enqueue broken");

    harness.platform.start();
    let done = wait_for_terminal(&harness.platform, ok.id)
        .await
        .expect("echo job should finish");
    let failed = wait_for_terminal(&harness.platform, bad.id)
        .await
        .expect("broken job should finish");
    harness.platform.stop().await;

    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(failed.status, JobStatus::Failed);
    assert_eq!(failed.attempts, 1);
    assert_eq!(failed.last_error.as_deref(), Some("always fails"));
    assert!(!harness.platform.jobs().is_running());
    assert!(
        harness
            .platform
            .list_jobs()
            .await
            .iter()
            .all(|job| job.status != JobStatus::Running)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn queued_jobs_survive_a_restart_with_a_file_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    let open_store = || -> Arc<dyn KeyValueStore> {
        Arc::new(JsonFileKeyValueStore::open(&root).expect("open file store"))
    };

    let first = Platform::builder(OrchestratorConfig::default())
        .with_store(open_store())
        .with_audit(Arc::new(InMemoryAuditLog::new()))
        .without_discovery()
        .build()
        .await
        .expect("first platform");
    let job = first
        .enqueue_job("echo", payload(json!({"keep": true})), 0)
        .await
        .expect("enqueue");
    drop(first);

    let store = open_store();
    let raw = store
        .get(STATE_KEY)
        .await
        .expect("read snapshot")
        .expect("snapshot persisted");
    assert!(raw.get("jobs").is_some_and(|jobs| jobs.get(job.id.to_string()).is_some()));

    let second = Platform::builder(OrchestratorConfig::default())
        .with_store(store)
        .with_audit(Arc::new(InMemoryAuditLog::new()))
        .without_discovery()
        .build()
        .await
        .expect("second platform");
    second.register_job_handler("echo", handler_fn(|input: Payload| async move { Ok(input) }));

    let restored = second.get_job(job.id).await.expect("job restored");
    assert_eq!(restored.status, JobStatus::Queued);
    let processed = second
        .jobs()
        .process_next()
        .await
        .expect("pass")
        .expect("restored job dispatched");
    assert_eq!(processed.result, Some(payload(json!({"keep": true}))));
}
