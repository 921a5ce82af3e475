//! Record of completed tasks
//!
//! Append-only apart from clearing, which tombstones a slot instead of
//! compacting. Marking a cleared id again appends a fresh slot.

#[derive(Debug, Default, Clone)]
pub struct DoneSet {
    slots: Vec<Option<String>>,
}

impl DoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Record `id`; false if it was already recorded
    pub fn mark(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.slots.push(Some(id.to_string()));
        true
    }

    /// Tombstone `id`; false if it was not recorded
    pub fn clear(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.slots[index] = None;
                true
            }
            None => false,
        }
    }

    /// Live ids in completion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }

    /// Number of slots, tombstones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_deref() == Some(id))
    }
}
