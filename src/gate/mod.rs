//! Confirmation gate
//!
//! Two-step guard in front of the costly or destructive dashboard actions.
//! A trigger opens a dialog with action-specific copy; only an explicit
//! confirm hands the action back to the caller for execution, and cancel or
//! dismiss performs no side effect at all.

use parking_lot::Mutex;
use serde::Serialize;

/// Visual affordance of the confirm control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStyle {
    /// Destructive action.
    Danger,
    /// Costly but recoverable action.
    Primary,
}

/// The guarded actions. A closed set: the gate never fronts arbitrary work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedAction {
    /// Delete every document in the collection.
    ClearCollection,
    /// Execute the full operation catalog.
    RunAll,
}

impl GuardedAction {
    /// Dialog title.
    pub fn title(&self) -> &'static str {
        match self {
            GuardedAction::ClearCollection => "Clear collection?",
            GuardedAction::RunAll => "Run all operations?",
        }
    }

    /// Dialog body copy.
    pub fn body(&self) -> &'static str {
        match self {
            GuardedAction::ClearCollection => {
                "This permanently deletes every document in the collection. \
                 This cannot be undone."
            }
            GuardedAction::RunAll => {
                "This executes the full operation catalog against the \
                 collection in order. Existing documents will be modified."
            }
        }
    }

    /// Styling for the confirm affordance.
    pub fn style(&self) -> ActionStyle {
        match self {
            GuardedAction::ClearCollection => ActionStyle::Danger,
            GuardedAction::RunAll => ActionStyle::Primary,
        }
    }
}

/// Dialog state for a requested, not-yet-confirmed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    /// The action awaiting confirmation.
    pub action: GuardedAction,
    /// Dialog title.
    pub title: &'static str,
    /// Dialog body copy.
    pub body: &'static str,
    /// Confirm affordance styling.
    pub style: ActionStyle,
}

/// Holds at most one pending action. A request while a dialog is already
/// open replaces it; the view renders a single modal.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Mutex<Option<PendingAction>>,
}

impl ConfirmationGate {
    /// A gate with no pending action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the confirmation dialog for `action`.
    pub fn request(&self, action: GuardedAction) -> PendingAction {
        let pending = PendingAction {
            action,
            title: action.title(),
            body: action.body(),
            style: action.style(),
        };
        *self.pending.lock() = Some(pending.clone());
        pending
    }

    /// The currently open dialog, if any.
    pub fn pending(&self) -> Option<PendingAction> {
        self.pending.lock().clone()
    }

    /// Explicit confirm: closes the dialog and returns the action for the
    /// caller to execute. `None` when no dialog is open.
    pub fn confirm(&self) -> Option<GuardedAction> {
        self.pending.lock().take().map(|p| p.action)
    }

    /// Cancel or dismiss: closes the dialog with no side effect.
    pub fn cancel(&self) {
        *self.pending.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destructive_actions_get_danger_styling() {
        assert_eq!(GuardedAction::ClearCollection.style(), ActionStyle::Danger);
        assert_eq!(GuardedAction::RunAll.style(), ActionStyle::Primary);
    }

    #[test]
    fn request_replaces_open_dialog() {
        let gate = ConfirmationGate::new();
        gate.request(GuardedAction::RunAll);
        gate.request(GuardedAction::ClearCollection);
        assert_eq!(
            gate.pending().map(|p| p.action),
            Some(GuardedAction::ClearCollection)
        );
    }
}
