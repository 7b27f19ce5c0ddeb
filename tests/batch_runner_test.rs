//! Batch runner tests
//!
//! Sequential execution over the full catalog, partial-failure accumulation,
//! the concurrent-trigger guard, and timeout handling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use runstream::catalog::{Catalog, OperationKind};
use runstream::channel::{EventSink, NullSink};
use runstream::protocol::ProgressEvent;
use runstream::runner::{BatchRunner, RunnerError};
use runstream::store::{DocumentStore, MemoryStore, StoreError};

/// Per-operation behavior script for failure and latency injection.
enum Behavior {
    Fail(&'static str),
    Delay(Duration),
}

#[derive(Default)]
struct ScriptedStore {
    behaviors: HashMap<&'static str, Behavior>,
    clear_calls: AtomicUsize,
}

impl ScriptedStore {
    fn new() -> Self {
        Self::default()
    }

    fn with(mut self, operation: &'static str, behavior: Behavior) -> Self {
        self.behaviors.insert(operation, behavior);
        self
    }

    fn delay_all(kinds: &[OperationKind], delay: Duration) -> Self {
        let mut store = Self::new();
        for kind in kinds {
            store.behaviors.insert(kind.name(), Behavior::Delay(delay));
        }
        store
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn execute(&self, kind: OperationKind, _payload: &Value) -> Result<Value, StoreError> {
        match self.behaviors.get(kind.name()) {
            Some(Behavior::Fail(message)) => Err(StoreError::Unavailable(message.to_string())),
            Some(Behavior::Delay(delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(json!({ "operation": kind.name() }))
            }
            None => Ok(json!({ "operation": kind.name() })),
        }
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }
}

#[derive(Default)]
struct CollectSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectSink {
    fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for CollectSink {
    fn emit(&self, event: &ProgressEvent) {
        self.events.lock().push(event.clone());
    }
}

#[tokio::test]
async fn full_catalog_run_records_every_operation() {
    let runner = BatchRunner::new(
        Arc::new(MemoryStore::new()),
        Catalog::standard(),
        Arc::new(NullSink),
    );

    let report = runner.run_all().await.expect("run should start");

    let catalog = Catalog::standard();
    assert_eq!(report.outcomes.len(), catalog.len());
    for (outcome, spec) in report.outcomes.iter().zip(catalog.iter()) {
        assert_eq!(outcome.name, spec.name());
        assert_eq!(outcome.success, outcome.error.is_none());
    }
    assert!(report.summary.is_consistent());
    assert_eq!(report.summary.total_operations, catalog.len());

    // The in-memory store rejects exactly the server-removed legacy commands.
    let failed: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| !o.success)
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(failed, vec!["map_reduce", "inline_map_reduce", "reindex"]);

    // Re-running executes the identical sequence.
    let again = runner.run_all().await.expect("second run should start");
    let names: Vec<_> = report.outcomes.iter().map(|o| &o.name).collect();
    let names_again: Vec<_> = again.outcomes.iter().map(|o| &o.name).collect();
    assert_eq!(names, names_again);
}

#[tokio::test]
async fn event_stream_has_protocol_shape() {
    let sink = Arc::new(CollectSink::default());
    let catalog = Catalog::standard();
    let total = catalog.len();
    let runner = BatchRunner::new(Arc::new(MemoryStore::new()), catalog, sink.clone());

    let report = runner.run_all().await.expect("run should start");
    let events = sink.events();

    assert_eq!(events.len(), 2 * total + 2);
    assert_eq!(
        events[0],
        ProgressEvent::Start {
            total,
            message: format!("Starting sequential execution of {} operations...", total),
        }
    );

    for index in 0..total {
        let current = index + 1;
        match &events[1 + index * 2] {
            ProgressEvent::OperationStart { current: c, .. } => assert_eq!(*c, current),
            other => panic!("expected operation_start, got {}", other.kind()),
        }
        match &events[2 + index * 2] {
            ProgressEvent::OperationComplete {
                current: c,
                operation,
                success,
                error,
                ..
            } => {
                assert_eq!(*c, current);
                assert_eq!(operation, &report.outcomes[index].name);
                assert_eq!(*success, report.outcomes[index].success);
                assert_eq!(error.is_some(), !success);
            }
            other => panic!("expected operation_complete, got {}", other.kind()),
        }
    }

    match events.last().expect("terminal event") {
        ProgressEvent::Complete { summary, .. } => assert_eq!(summary, &report.summary),
        other => panic!("expected complete, got {}", other.kind()),
    }
}

#[tokio::test]
async fn failing_operation_does_not_abort_the_batch() {
    let store = ScriptedStore::new().with("find", Behavior::Fail("duplicate key"));
    let catalog = Catalog::of(&[
        OperationKind::InsertOne,
        OperationKind::Find,
        OperationKind::DeleteOne,
    ]);
    let runner = BatchRunner::new(Arc::new(store), catalog, Arc::new(NullSink));

    let report = runner.run_all().await.expect("run should start");

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].success);
    assert!(!report.outcomes[1].success);
    assert!(report.outcomes[1]
        .error
        .as_deref()
        .unwrap()
        .contains("duplicate key"));
    assert!(report.outcomes[2].success);
    assert_eq!(report.summary.successful, 2);
    assert_eq!(report.summary.failed, 1);
    assert!(report.summary.is_consistent());
}

#[tokio::test]
async fn unreachable_store_never_short_circuits() {
    let kinds = [
        OperationKind::InsertOne,
        OperationKind::Find,
        OperationKind::UpdateOne,
        OperationKind::DeleteOne,
    ];
    let mut store = ScriptedStore::new();
    for kind in kinds {
        store = store.with(kind.name(), Behavior::Fail("connection refused"));
    }
    let runner = BatchRunner::new(Arc::new(store), Catalog::of(&kinds), Arc::new(NullSink));

    let report = runner.run_all().await.expect("run should start");

    assert_eq!(report.outcomes.len(), kinds.len());
    assert!(report.outcomes.iter().all(|o| !o.success));
    assert_eq!(report.summary.failed, kinds.len());
    assert_eq!(report.summary.successful, 0);
}

#[tokio::test]
async fn concurrent_trigger_is_rejected() {
    let kinds = [OperationKind::InsertOne, OperationKind::Find];
    let store = ScriptedStore::delay_all(&kinds, Duration::from_millis(100));
    let runner = Arc::new(BatchRunner::new(
        Arc::new(store),
        Catalog::of(&kinds),
        Arc::new(NullSink),
    ));

    let background = {
        let runner = runner.clone();
        tokio::spawn(async move { runner.run_all().await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(runner.is_running());
    let second = runner.run_all().await;
    assert!(matches!(second, Err(RunnerError::AlreadyRunning)));

    let first = background.await.expect("task").expect("first run completes");
    assert_eq!(first.outcomes.len(), kinds.len());
    assert!(!runner.is_running());

    // The guard releases: a later trigger is accepted again.
    let third = runner.run_all().await.expect("third run should start");
    assert_eq!(third.outcomes.len(), kinds.len());
}

#[tokio::test]
async fn timeout_becomes_a_failure_outcome() {
    let store = ScriptedStore::new().with("find", Behavior::Delay(Duration::from_millis(200)));
    let catalog = Catalog::of(&[OperationKind::InsertOne, OperationKind::Find]);
    let runner = BatchRunner::new(Arc::new(store), catalog, Arc::new(NullSink))
        .with_timeout(Duration::from_millis(20));

    let report = runner.run_all().await.expect("run should start");

    assert!(report.outcomes[0].success);
    let timed_out = &report.outcomes[1];
    assert!(!timed_out.success);
    assert!(timed_out.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(report.summary.failed, 1);
}

#[tokio::test]
async fn collection_is_cleared_before_each_run_by_default() {
    let store = Arc::new(ScriptedStore::new());
    let catalog = Catalog::of(&[OperationKind::InsertOne]);
    let runner = BatchRunner::new(store.clone(), catalog.clone(), Arc::new(NullSink));
    runner.run_all().await.expect("run should start");
    assert_eq!(store.clear_calls.load(Ordering::SeqCst), 1);

    let untouched = Arc::new(ScriptedStore::new());
    let runner = BatchRunner::new(untouched.clone(), catalog, Arc::new(NullSink))
        .with_clear_before_run(false);
    runner.run_all().await.expect("run should start");
    assert_eq!(untouched.clear_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn summary_time_is_the_sum_of_outcome_durations() {
    let runner = BatchRunner::new(
        Arc::new(MemoryStore::new()),
        Catalog::standard(),
        Arc::new(NullSink),
    );
    let report = runner.run_all().await.expect("run should start");
    let sum: u64 = report.outcomes.iter().map(|o| o.duration_ms).sum();
    assert_eq!(report.summary.total_time_ms, sum);
}
