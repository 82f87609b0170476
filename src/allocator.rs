use crate::data::{SlotId, TimeSlot};
use log::debug;

/// Issues increasing ids for time slots created by hand.
///
/// Collision avoidance only runs forward: [`reconcile`](Self::reconcile) moves the
/// counter past every id it is shown, but duplicates that arrive through an import
/// are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotIdAllocator {
    // one width wider than SlotId so the counter can step past SlotId::MAX
    counter: u64,
}

impl Default for SlotIdAllocator {
    fn default() -> Self {
        Self { counter: 1 }
    }
}

impl SlotIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current counter value and advances it, or `None` once every
    /// id up to `SlotId::MAX` has been handed out.
    pub fn next(&mut self) -> Option<SlotId> {
        let id = SlotId::try_from(self.counter).ok()?;
        self.counter += 1;
        Some(id)
    }

    /// The id the next call to [`next`](Self::next) will return.
    pub fn peek(&self) -> Option<SlotId> {
        SlotId::try_from(self.counter).ok()
    }

    /// Sets the counter to `1 + max(slot_id)` over `existing` (0 when empty).
    pub fn reconcile(&mut self, existing: &[TimeSlot]) {
        let max = existing.iter().map(|s| s.slot_id).max().unwrap_or(0);
        self.counter = u64::from(max) + 1;
        debug!("slot id counter reconciled to {}", self.counter);
    }
}
