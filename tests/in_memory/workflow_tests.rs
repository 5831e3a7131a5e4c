//! End-to-end workflow integration tests through the platform.

use std::sync::Arc;

use super::helpers::{TestPlatform, context, payload, test_platform};
use gitvibe_orchestrator::agent::domain::AgentSpec;
use gitvibe_orchestrator::agent::ports::handler_fn as agent_fn;
use gitvibe_orchestrator::config::OrchestratorConfig;
use gitvibe_orchestrator::context::{ExecutionContext, Payload};
use gitvibe_orchestrator::event_bus::{EventEnvelope, WILDCARD_TOPIC, handler_fn as event_fn};
use gitvibe_orchestrator::job_queue::domain::JobStatus;
use gitvibe_orchestrator::job_queue::ports::{JobHandlerError, handler_fn as job_fn};
use gitvibe_orchestrator::plugin::adapters::HealthProbePlugin;
use gitvibe_orchestrator::workflow::domain::{StepKind, WorkflowDefinition, WorkflowStep};
use gitvibe_orchestrator::workflow::services::WorkflowEngine;
use parking_lot::Mutex;
use serde_json::{Value, json};

async fn review_platform() -> TestPlatform {
    let harness = test_platform(OrchestratorConfig::default()).await;
    harness
        .platform
        .register_agent(
            AgentSpec::new("ai-review-agent", "1.0.0")
                .with_description("Reviews pull request diffs.")
                .with_capabilities(["review", "pull_request"]),
            agent_fn(|input: Payload, context: ExecutionContext| async move {
                let mut out = Payload::new();
                out.insert("status".to_owned(), json!("reviewed"));
                out.insert("pr".to_owned(), input.get("pr").cloned().unwrap_or(Value::Null));
                out.insert("provider".to_owned(), json!(context.git_provider));
                Ok(out)
            }),
        )
        .expect("register agent");
    harness
        .platform
        .register_workflow(
            WorkflowDefinition::new("pr-review-pipeline", "1.0.0").with_steps([
                WorkflowStep::new("emit-start", StepKind::Event, "workflow.pr_review.started"),
                WorkflowStep::new("ai-review", StepKind::Agent, "ai-review-agent"),
                WorkflowStep::new("probe", StepKind::Plugin, HealthProbePlugin::NAME),
                WorkflowStep::new("emit-complete", StepKind::Event, "workflow.pr_review.completed"),
            ]),
        )
        .expect("register workflow");
    harness
}

#[tokio::test(flavor = "multi_thread")]
async fn review_pipeline_runs_every_step_in_order() {
    let harness = review_platform().await;
    let observed: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&observed);
    harness.platform.bus().subscribe(
        WILDCARD_TOPIC,
        event_fn(move |event: EventEnvelope| {
            let log = Arc::clone(&sink);
            async move {
                log.lock().push(event.topic().to_owned());
            }
        }),
    );

    let outcome = harness
        .platform
        .run_workflow("pr-review-pipeline", &payload(json!({"pr": 5})), &context())
        .await
        .expect("pipeline should succeed");

    let steps: Vec<(&str, StepKind)> = outcome
        .steps
        .iter()
        .map(|step| (step.id.as_str(), step.kind))
        .collect();
    assert_eq!(
        steps,
        vec![
            ("emit-start", StepKind::Event),
            ("ai-review", StepKind::Agent),
            ("probe", StepKind::Plugin),
            ("emit-complete", StepKind::Event),
        ]
    );
    let review = outcome.steps.get(1).expect("agent step");
    assert_eq!(
        review.result.get("result"),
        Some(&json!({"status": "reviewed", "pr": 5, "provider": "github"}))
    );
    assert_eq!(
        *observed.lock(),
        vec![
            "workflow.started",
            "workflow.pr_review.started",
            "agent.started",
            "agent.completed",
            "plugin.pre_execute",
            "plugin.post_execute",
            "workflow.pr_review.completed",
            "workflow.completed",
        ]
    );
    assert_eq!(harness.audit.events(), vec!["plugin_executed"]);
}

async fn run_named_workflow(
    engine: Arc<WorkflowEngine>,
    input: Payload,
) -> Result<Payload, JobHandlerError> {
    let name = input
        .get("workflow")
        .and_then(Value::as_str)
        .ok_or_else(|| JobHandlerError::new("workflow name missing"))?
        .to_owned();
    let outcome = engine
        .run_workflow(&name, &input, &context())
        .await
        .map_err(|err| JobHandlerError::from_error(&err))?;
    Ok(outcome.to_payload())
}

#[tokio::test(flavor = "multi_thread")]
async fn workflows_can_run_as_background_jobs() {
    let harness = review_platform().await;
    let workflows = Arc::clone(harness.platform.workflows());
    harness.platform.register_job_handler(
        "workflow",
        job_fn(move |input: Payload| run_named_workflow(Arc::clone(&workflows), input)),
    );

    let job = harness
        .platform
        .enqueue_job("workflow", payload(json!({"workflow": "pr-review-pipeline", "pr": 9})), 0)
        .await
        .expect("enqueue");
    let processed = harness
        .platform
        .jobs()
        .process_next()
        .await
        .expect("pass")
        .expect("job dispatched");

    assert_eq!(processed.id, job.id);
    assert_eq!(processed.status, JobStatus::Completed);
    let steps = processed
        .result
        .as_ref()
        .and_then(|result| result.get("steps"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    assert_eq!(steps, 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_workflow_job_records_the_error() {
    let harness = test_platform(OrchestratorConfig::default()).await;
    let workflows = Arc::clone(harness.platform.workflows());
    harness.platform.register_job_handler(
        "workflow",
        job_fn(move |_input: Payload| {
            let engine = Arc::clone(&workflows);
            async move {
                engine
                    .run_workflow("missing", &Payload::new(), &context())
                    .await
                    .map(|outcome| outcome.to_payload())
                    .map_err(|err| JobHandlerError::from_error(&err))
            }
        }),
    );

    harness
        .platform
        .enqueue_job("workflow", Payload::new(), 0)
        .await
        .expect("enqueue");
    let processed = harness
        .platform
        .jobs()
        .process_next()
        .await
        .expect("pass")
        .expect("job dispatched");

    assert_eq!(processed.status, JobStatus::Failed);
    assert_eq!(processed.last_error.as_deref(), Some("Unknown workflow 'missing'."));
}
