use std::collections::HashSet;

use slint::VecModel;

use crate::view::{ObjectId, View};

/// Per-view selection set.
///
/// The set is the source of truth; [`SelectionManager::apply_to_view`]
/// mirrors it onto the `selected` flags of the view's objects.
#[derive(Debug, Default, Clone)]
pub struct SelectionManager {
    selected: HashSet<ObjectId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection change for a completed click: plain click selects only
    /// `id`, a toggling click (Ctrl/Shift) flips its membership.
    pub fn handle_interaction(&mut self, id: ObjectId, toggle: bool) {
        if toggle {
            if self.selected.contains(&id) {
                self.selected.remove(&id);
            } else {
                self.selected.insert(id);
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(&id) {
                return;
            }
            self.selected.clear();
            self.selected.insert(id);
        }
    }

    /// Selection change on button press.
    ///
    /// Pressing an already selected object keeps the group so it can be
    /// dragged together; the group collapses only if the press turns out to
    /// be a click.
    pub fn handle_press(&mut self, id: ObjectId, toggle: bool) {
        if toggle {
            self.handle_interaction(id, true);
        } else if !self.selected.contains(&id) {
            self.handle_interaction(id, false);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection with a new set of IDs
    ///
    /// Useful for box selection sync
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ObjectId>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Drops ids whose objects no longer exist. Returns how many were removed.
    pub fn prune(&mut self, view: &View) -> usize {
        let before = self.selected.len();
        self.selected.retain(|&id| view.contains(id));
        before - self.selected.len()
    }

    /// Mirrors the set onto the objects' `selected` flags.
    pub fn apply_to_view(&self, view: &mut View) {
        let ids: Vec<ObjectId> = view.objects().map(|o| o.id).collect();
        for id in ids {
            if let Some(object) = view.get_mut(id) {
                object.selected = self.selected.contains(&id);
            }
        }
    }

    /// Publishes the selection to a Slint model, ids ascending.
    pub fn sync_to_model(&self, model: &VecModel<ObjectId>) {
        model.set_vec(self.ids());
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
