//! Transaction boundary around committed edits.
//!
//! Every geometric commit and every creation command runs between
//! `start_command_variation` and either `complete_command_variation` or
//! `discard_command_variation`. The boundary is a collaborator: hosts with
//! their own edit engine implement [`TransactionBoundary`]; the crate ships
//! [`SnapshotHistory`], which snapshots the composition at start.

use log::{trace, warn};

use crate::view::Composition;

pub trait TransactionBoundary {
    /// Opens a named transaction over the current state.
    fn start_command_variation(&mut self, name: &str, state: &Composition);

    /// Keeps the changes made since the matching start.
    fn complete_command_variation(&mut self);

    /// Drops the open transaction, restoring `state` where the boundary can.
    fn discard_command_variation(&mut self, state: &mut Composition);

    /// Reverts the last completed transaction. Returns whether anything was
    /// undone.
    fn undo(&mut self, state: &mut Composition) -> bool;

    /// Name of the open transaction, if any.
    fn pending(&self) -> Option<&str>;
}

/// Undo history built from whole-composition snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    pending: Option<(String, Composition)>,
    done: Vec<(String, Composition)>,
    limit: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl SnapshotHistory {
    /// History keeping at most `limit` undo steps.
    pub fn new(limit: usize) -> Self {
        Self {
            pending: None,
            done: Vec::new(),
            limit,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.done.len()
    }

    /// Names of completed transactions, oldest first.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.done.iter().map(|(name, _)| name.as_str())
    }
}

impl TransactionBoundary for SnapshotHistory {
    fn start_command_variation(&mut self, name: &str, state: &Composition) {
        if let Some((previous, _)) = &self.pending {
            warn!(previous = previous.as_str(), next = name; "Transaction started while another is open");
        }
        trace!(name = name; "Transaction started");
        self.pending = Some((name.to_string(), state.clone()));
    }

    fn complete_command_variation(&mut self) {
        if let Some(entry) = self.pending.take() {
            trace!(name = entry.0.as_str(); "Transaction completed");
            self.done.push(entry);
            if self.done.len() > self.limit {
                self.done.remove(0);
            }
        }
    }

    fn discard_command_variation(&mut self, state: &mut Composition) {
        if let Some((name, snapshot)) = self.pending.take() {
            trace!(name = name.as_str(); "Transaction discarded");
            *state = snapshot;
        }
    }

    fn undo(&mut self, state: &mut Composition) -> bool {
        match self.done.pop() {
            Some((name, snapshot)) => {
                trace!(name = name.as_str(); "Transaction undone");
                *state = snapshot;
                true
            }
            None => false,
        }
    }

    fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Domain, IdeaDefinition};
    use crate::geometry::Rect;
    use crate::view::{SymbolData, VisualKind};

    fn composition() -> Composition {
        let mut domain = Domain::new();
        domain.add_definition(IdeaDefinition::concept(1, "Concept"));
        let idea = domain.create_concept(1, "A").unwrap();
        let mut composition = Composition::new(domain);
        composition
            .view
            .insert(Rect::new(0.0, 0.0, 10.0, 10.0), VisualKind::Symbol(SymbolData::new(idea)));
        composition
    }

    #[test]
    fn test_discard_restores_snapshot() {
        let mut state = composition();
        let mut history = SnapshotHistory::default();

        history.start_command_variation("Move", &state);
        assert_eq!(history.pending(), Some("Move"));
        state.view.get_mut(1).unwrap().bounds = Rect::new(50.0, 50.0, 10.0, 10.0);
        history.discard_command_variation(&mut state);

        assert_eq!(state.view.bounds(1), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(history.pending(), None);
        assert_eq!(history.undo_depth(), 0);
    }

    #[test]
    fn test_complete_then_undo() {
        let mut state = composition();
        let mut history = SnapshotHistory::default();

        history.start_command_variation("Move", &state);
        state.view.get_mut(1).unwrap().bounds = Rect::new(50.0, 50.0, 10.0, 10.0);
        history.complete_command_variation();

        assert_eq!(history.names().collect::<Vec<_>>(), vec!["Move"]);
        assert!(history.undo(&mut state));
        assert_eq!(state.view.bounds(1), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!history.undo(&mut state));
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let mut state = composition();
        let mut history = SnapshotHistory::new(2);
        for name in ["a", "b", "c"] {
            history.start_command_variation(name, &state);
            history.complete_command_variation();
        }
        assert_eq!(history.names().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(history.undo(&mut state));
    }

    #[test]
    fn test_complete_without_start_is_noop() {
        let mut history = SnapshotHistory::default();
        history.complete_command_variation();
        assert_eq!(history.undo_depth(), 0);
    }
}
