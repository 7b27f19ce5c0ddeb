//! End-to-end demo: run the full operation catalog against the in-memory
//! store while an observer reconstructs live progress from the event stream.
//!
//! ```bash
//! RUST_LOG=runstream=info cargo run --example run_all
//! ```

use std::sync::Arc;
use std::time::Instant;

use runstream::catalog::Catalog;
use runstream::channel::ProgressChannel;
use runstream::gate::{ConfirmationGate, GuardedAction};
use runstream::notify::{NotificationSink, Severity};
use runstream::runner::BatchRunner;
use runstream::session::{RunPhase, RunReconstructor};
use runstream::store::MemoryStore;

#[tokio::main]
async fn main() -> runstream::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let channel = Arc::new(ProgressChannel::new(128));
    let store = Arc::new(MemoryStore::new());
    let runner = BatchRunner::new(store.clone(), Catalog::standard(), channel.clone());

    // Attach the observer before triggering: events emitted with nobody
    // listening are lost.
    let mut feed = channel.connect();
    let observer = tokio::spawn(async move {
        let mut view = RunReconstructor::new();
        while let Some(event) = feed.next_event().await {
            view.apply(event);
            println!(
                "[{:>5.1}%] {:>2}/{:<2} {}",
                view.progress_percent(),
                view.session().current,
                view.session().total,
                view.session().message,
            );
            if view.phase() == RunPhase::Complete {
                break;
            }
        }
        feed.disconnect();
        view
    });

    // Two-step confirmation before the costly trigger.
    let gate = ConfirmationGate::new();
    let dialog = gate.request(GuardedAction::RunAll);
    println!("{}\n{}\n-> confirmed\n", dialog.title, dialog.body);
    let confirmed = gate.confirm();
    assert_eq!(confirmed, Some(GuardedAction::RunAll));

    let report = runner.run_all().await?;
    let view = observer.await?;

    let notifications = NotificationSink::new();
    let severity = if report.summary.failed == 0 {
        Severity::Success
    } else {
        Severity::Warning
    };
    notifications.push(severity, view.session().message.clone(), Instant::now());

    println!(
        "\nrun {}: {}/{} succeeded, {} failed, {}ms total",
        report.run_id,
        report.summary.successful,
        report.summary.total_operations,
        report.summary.failed,
        report.summary.total_time_ms,
    );
    for outcome in report.outcomes.iter().filter(|o| !o.success) {
        println!(
            "  failed: {} ({})",
            outcome.name,
            outcome.error.as_deref().unwrap_or("unknown")
        );
    }
    for note in notifications.visible(Instant::now()) {
        println!("notification [{:?}]: {}", note.severity, note.text);
    }
    println!(
        "collection `{}` holds {} documents",
        store.active_collection(),
        store.document_count(),
    );
    Ok(())
}
