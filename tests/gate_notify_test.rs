//! Confirmation gate and notification sink tests.

use std::time::{Duration, Instant};

use runstream::gate::{ActionStyle, ConfirmationGate, GuardedAction};
use runstream::notify::{NotificationSink, Severity, NOTIFICATION_TTL};

#[test]
fn confirm_executes_exactly_the_requested_action() {
    let gate = ConfirmationGate::new();
    assert_eq!(gate.confirm(), None);

    let dialog = gate.request(GuardedAction::RunAll);
    assert_eq!(dialog.style, ActionStyle::Primary);
    assert_eq!(dialog.title, "Run all operations?");
    assert!(gate.pending().is_some());

    assert_eq!(gate.confirm(), Some(GuardedAction::RunAll));
    // The dialog is consumed: confirming twice runs nothing twice.
    assert_eq!(gate.confirm(), None);
    assert!(gate.pending().is_none());
}

#[test]
fn cancel_has_no_side_effect() {
    let gate = ConfirmationGate::new();
    let dialog = gate.request(GuardedAction::ClearCollection);
    assert_eq!(dialog.style, ActionStyle::Danger);

    gate.cancel();
    assert!(gate.pending().is_none());
    assert_eq!(gate.confirm(), None);
}

#[test]
fn notifications_render_in_insertion_order() {
    let sink = NotificationSink::new();
    let now = Instant::now();
    sink.push(Severity::Info, "first", now);
    sink.push(Severity::Success, "second", now);
    sink.push(Severity::Error, "third", now);

    let texts: Vec<_> = sink
        .visible(now)
        .into_iter()
        .map(|n| n.text)
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[test]
fn identity_is_a_counter_not_a_timestamp() {
    let sink = NotificationSink::new();
    let now = Instant::now();
    // Same creation instant; identities must still differ.
    let a = sink.push(Severity::Info, "a", now);
    let b = sink.push(Severity::Info, "b", now);
    assert_ne!(a, b);
    assert!(b > a);

    assert!(sink.dismiss(a));
    let remaining = sink.visible(now);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b);
}

#[test]
fn each_message_expires_on_its_own_timer() {
    let sink = NotificationSink::new();
    let start = Instant::now();
    sink.push(Severity::Warning, "early", start);
    sink.push(Severity::Info, "late", start + Duration::from_secs(3));

    // Just before the first deadline both are visible.
    assert_eq!(sink.visible(start + Duration::from_millis(3900)).len(), 2);

    // Past the first deadline only the later message remains.
    let visible = sink.visible(start + NOTIFICATION_TTL + Duration::from_millis(100));
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].text, "late");

    // And it expires four seconds after its own creation.
    assert!(sink
        .visible(start + Duration::from_secs(3) + NOTIFICATION_TTL + Duration::from_millis(100))
        .is_empty());
}

#[test]
fn dismissing_an_expired_or_unknown_id_is_harmless() {
    let sink = NotificationSink::new();
    let now = Instant::now();
    let id = sink.push(Severity::Info, "gone", now);
    assert!(sink.visible(now + NOTIFICATION_TTL + Duration::from_secs(1)).is_empty());
    assert!(!sink.dismiss(id));
    assert!(!sink.dismiss(9999));
}
