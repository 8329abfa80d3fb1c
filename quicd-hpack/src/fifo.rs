//! Growable ring buffer backing the decoder's dynamic table.
//!
//! New entries go in at `head`, old ones leave from `tail`. Position 0 is
//! the most recently added entry. `head == tail` means empty: the buffer
//! doubles as soon as an insertion would make it full.

use crate::header::HeaderEntry;

const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug)]
pub(crate) struct FifoBuffer {
    slots: Vec<Option<HeaderEntry>>,
    head: usize,
    tail: usize,
}

impl FifoBuffer {
    pub(crate) fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            head: 0,
            tail: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        if self.head >= self.tail {
            self.head - self.tail
        } else {
            self.slots.len() - self.tail + self.head
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub(crate) fn add_first(&mut self, entry: HeaderEntry) {
        self.slots[self.head] = Some(entry);
        self.head = (self.head + 1) % self.slots.len();
        if self.head == self.tail {
            self.expand();
        }
    }

    /// Returns the entry `index` positions back from the newest (0-based).
    pub(crate) fn get(&self, index: usize) -> Option<&HeaderEntry> {
        if index >= self.len() {
            return None;
        }
        let capacity = self.slots.len();
        let pos = (self.head + capacity - index - 1) % capacity;
        self.slots[pos].as_ref()
    }

    pub(crate) fn remove_last(&mut self) -> Option<HeaderEntry> {
        if self.is_empty() {
            return None;
        }
        let entry = self.slots[self.tail].take();
        self.tail = (self.tail + 1) % self.slots.len();
        entry
    }

    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
    }

    /// Doubles capacity, repacking entries oldest-first from slot 0.
    fn expand(&mut self) {
        // Only called when full, so head == tail and every slot is occupied
        let old_capacity = self.slots.len();
        let mut slots = Vec::with_capacity(old_capacity * 2);
        slots.extend(self.slots[self.tail..].iter_mut().map(Option::take));
        slots.extend(self.slots[..self.head].iter_mut().map(Option::take));
        slots.resize_with(old_capacity * 2, || None);

        self.slots = slots;
        self.tail = 0;
        self.head = old_capacity;
    }
}
