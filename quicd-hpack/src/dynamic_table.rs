//! Decoder-side dynamic table.
//!
//! The dynamic table is a FIFO of header entries bounded by a byte budget
//! (RFC 7541 Section 2.3.2 and Section 4). The decoder only ever resolves
//! entries by position, so a ring buffer is all it needs.
//!
//! Combined addressing: indexes `1..=61` are the static table, and
//! `62..` address this table, 62 being the most recently inserted entry.

use crate::error::{Error, Result};
use crate::fifo::FifoBuffer;
use crate::header::HeaderEntry;
use crate::static_table;

/// The decoder's dynamic table.
#[derive(Debug)]
pub struct DynamicTable {
    entries: FifoBuffer,
    current_size: usize,
    max_size: usize,
}

impl DynamicTable {
    /// Creates a new dynamic table with the given maximum size in bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: FifoBuffer::new(),
            current_size: 0,
            max_size,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the sizes of all entries.
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Gets an entry by 1-based dynamic index (1 = most recent).
    pub fn get(&self, index: usize) -> Option<&HeaderEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Resolves a combined static + dynamic index.
    pub fn get_header(&self, index: usize) -> Result<&HeaderEntry> {
        let entry = if index <= static_table::len() {
            static_table::get(index)
        } else {
            self.get(index - static_table::len())
        };
        entry.ok_or(Error::InvalidTableIndex(index))
    }

    /// Inserts an entry, evicting the oldest ones to stay within budget.
    ///
    /// An entry larger than the maximum size empties the table and is not
    /// inserted (RFC 7541 Section 4.4).
    pub fn add(&mut self, entry: HeaderEntry) {
        let size = entry.total_size();
        if size > self.max_size {
            self.clear();
            return;
        }

        self.entries.add_first(entry);
        self.current_size += size;
        self.evict();
    }

    /// Sets a new maximum size, evicting entries if necessary.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.evict();
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_size = 0;
    }

    fn evict(&mut self) {
        while self.current_size > self.max_size {
            match self.entries.remove_last() {
                Some(entry) => self.current_size -= entry.total_size(),
                None => {
                    debug_assert_eq!(self.current_size, 0, "size accounting drifted");
                    self.current_size = 0;
                    break;
                }
            }
        }
    }
}

impl Default for DynamicTable {
    /// An unbounded table, for use before any limit has been negotiated.
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}
