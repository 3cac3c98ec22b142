//! SQLite persistence round trips.

mod common;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{epoch, hours, quiet_config};
use lynx_orchestrator::adapters::sqlite::{create_migrated_test_pool, SqliteSink};
use lynx_orchestrator::application::Orchestrator;
use lynx_orchestrator::domain::models::{
    OrchestratorConfig, SystemEvent, SystemEventKind, Task, TaskCategory, TaskDraft, TaskId,
    TaskPriority, TaskStatus,
};
use lynx_orchestrator::domain::ports::{PersistenceSink, ProcessingError, TaskProcessor};
use serde_json::json;

/// Completes in one pass unless the task targets security.
struct SecurityScanFails;

impl TaskProcessor for SecurityScanFails {
    fn process(&self, task: &Task, _now: DateTime<Utc>) -> Result<f64, ProcessingError> {
        match task.category {
            TaskCategory::Security => Err(ProcessingError::Failed("scanner rejected build".into())),
            _ => Ok(100.0),
        }
    }
}

async fn sink() -> SqliteSink {
    SqliteSink::new(create_migrated_test_pool().await.unwrap())
}

fn sample_task() -> Task {
    let draft = TaskDraft::new(
        TaskCategory::Security,
        "Implement security and compliance measures",
        96.0,
    )
    .with_priority(TaskPriority::Critical)
    .with_requirements(json!({ "compliance": ["SOC2", "GDPR"] }))
    .with_dependency(TaskId::from("task-1-abcdefghi"));
    Task::from_draft(TaskId::from("task-2-jklmnopqr"), draft, epoch())
}

#[tokio::test]
async fn test_task_upsert_round_trip() {
    let sink = sink().await;
    let mut task = sample_task();

    sink.persist_task(&task).await.unwrap();
    assert_eq!(sink.fetch_task(&task.id).await.unwrap(), Some(task.clone()));

    task.start(epoch() + hours(1)).unwrap();
    task.fail("scanner unavailable", epoch() + hours(2)).unwrap();
    sink.persist_task(&task).await.unwrap();

    let stored = sink.fetch_task(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Failed);
    assert_eq!(stored.errors, vec!["scanner unavailable".to_string()]);
    assert_eq!(stored.started_at, Some(epoch() + hours(1)));
    assert_eq!(stored.dependencies, task.dependencies);
    assert_eq!(stored.requirements["compliance"][1], "GDPR");
    assert_eq!(sink.count_tasks().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_task_is_none() {
    let sink = sink().await;
    assert!(sink
        .fetch_task(&TaskId::from("task-0-nothing"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_events_are_appended_in_order() {
    let sink = sink().await;
    sink.persist_event(&SystemEvent::new(SystemEventKind::SystemStarted, "up"))
        .await
        .unwrap();
    sink.persist_event(&SystemEvent::new(
        SystemEventKind::DevelopmentLoopError,
        "Error: boom",
    ))
    .await
    .unwrap();

    let events = sink.fetch_events().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, SystemEventKind::SystemStarted);
    assert_eq!(events[1].kind, SystemEventKind::DevelopmentLoopError);
    assert_eq!(events[1].message, "Error: boom");
}

#[tokio::test]
async fn test_orchestrator_writes_through_to_sqlite() {
    let sink = Arc::new(sink().await);
    let config = OrchestratorConfig {
        seed_bootstrap_plan: true,
        tick_interval_ms: 3_600_000,
        ..quiet_config(3)
    };
    let orchestrator = Orchestrator::new(config, sink.clone());

    orchestrator.start().await.unwrap();
    let report = orchestrator.tick_now().await.unwrap();
    orchestrator.stop().await;
    orchestrator.flush().await;

    assert_eq!(sink.count_tasks().await.unwrap(), 10);
    for id in &report.started {
        let stored = sink.fetch_task(id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::InProgress);
    }
    let kinds: Vec<_> = sink
        .fetch_events()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![SystemEventKind::SystemStarted, SystemEventKind::SystemStopped]
    );
}

#[tokio::test]
async fn test_terminal_states_reach_sqlite() {
    let sink = Arc::new(sink().await);
    let orchestrator =
        Orchestrator::with_processor(quiet_config(2), sink.clone(), Arc::new(SecurityScanFails));

    let done = orchestrator
        .add_task(TaskDraft::new(TaskCategory::Api, "Carrier rate API", 12.0))
        .await
        .unwrap();
    let failed = orchestrator
        .add_task(TaskDraft::new(TaskCategory::Security, "Harden auth", 12.0))
        .await
        .unwrap();

    orchestrator.tick_now().await.unwrap();
    orchestrator.flush().await;

    let stored = sink.fetch_task(&done).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
    assert!(stored.started_at.is_some());
    assert!(stored.actual_duration_hours.is_some());

    let stored = sink.fetch_task(&failed).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Failed);
    assert_eq!(stored.errors, vec!["scanner rejected build".to_string()]);
    assert!(stored.actual_duration_hours.is_none());
}
