use std::collections::HashSet;

use crate::model::NotificationId;

/// Multi-select mode for bulk deletion. The selection is session-only.
#[derive(Debug, Default)]
pub struct SelectionController {
    active: bool,
    bulk_in_flight: bool,
    selected: HashSet<NotificationId>,
}

impl SelectionController {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.bulk_in_flight
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &NotificationId) -> bool {
        self.selected.contains(id)
    }

    pub fn enter(&mut self) {
        self.active = true;
    }

    /// Leaves selection mode without side effects.
    pub fn cancel(&mut self) {
        self.active = false;
        self.bulk_in_flight = false;
        self.selected.clear();
    }

    /// Returns the new membership of `id`. No-op outside selection mode.
    pub fn toggle(&mut self, id: &NotificationId) -> bool {
        if !self.active || self.bulk_in_flight {
            return false;
        }
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    #[must_use]
    pub fn all_selected(&self, visible: &[NotificationId]) -> bool {
        !visible.is_empty() && self.selected.len() == visible.len()
    }

    /// Clears when the selection already covers every visible row,
    /// otherwise selects all of them.
    pub fn toggle_all(&mut self, visible: &[NotificationId]) {
        if !self.active || self.bulk_in_flight {
            return;
        }
        if self.selected.len() == visible.len() {
            self.selected.clear();
        } else {
            self.selected = visible.iter().cloned().collect();
        }
    }

    /// Marks the bulk delete as started and returns the ids to delete,
    /// visible rows first in display order, then any leftovers sorted.
    pub fn begin_bulk_delete(&mut self, visible: &[NotificationId]) -> Option<Vec<NotificationId>> {
        if !self.active || self.bulk_in_flight || self.selected.is_empty() {
            return None;
        }
        self.bulk_in_flight = true;

        let mut ordered: Vec<NotificationId> = visible
            .iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect();
        let mut rest: Vec<NotificationId> = self
            .selected
            .iter()
            .filter(|id| !visible.contains(*id))
            .cloned()
            .collect();
        rest.sort();
        ordered.extend(rest);
        Some(ordered)
    }

    /// Exits selection mode whatever the per-item outcomes were.
    pub fn finish_bulk_delete(&mut self) {
        self.cancel();
    }
}
