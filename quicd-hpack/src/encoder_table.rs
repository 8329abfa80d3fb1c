//! Encoder-side dynamic table.
//!
//! Same eviction rules and combined addressing as [`DynamicTable`], but the
//! encoder also needs to ask "is there already an entry with this name (and
//! value)?" on every header. Entries live in a [`Slab`] arena; a deque of
//! handles keeps FIFO order and a name index maps each name to its handles,
//! newest first. Both are updated within the same `&mut self` call.
//!
//! Every entry gets a sequence number one above the previous newest. Since
//! eviction only ever removes the oldest entry, live sequence numbers are
//! contiguous and an entry's position follows from its distance to the
//! oldest one.
//!
//! [`DynamicTable`]: crate::dynamic_table::DynamicTable

use std::collections::{HashMap, VecDeque};

use slab::Slab;

use crate::error::{Error, Result};
use crate::header::HeaderEntry;
use crate::static_table;

/// Stable reference to an entry in an [`EncoderDynamicTable`].
///
/// Carries the entry's sequence number, so a handle to an evicted entry
/// never resolves to a newer entry that reused its arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    key: usize,
    seq: u64,
}

#[derive(Debug)]
struct Node {
    entry: HeaderEntry,
    seq: u64,
}

/// The encoder's dynamic table.
#[derive(Debug)]
pub struct EncoderDynamicTable {
    arena: Slab<Node>,
    /// Handles, most recent first.
    fifo: VecDeque<EntryHandle>,
    /// Handles by name, most recent first.
    by_name: HashMap<String, VecDeque<EntryHandle>>,
    next_seq: u64,
    current_size: usize,
    max_size: usize,
}

impl EncoderDynamicTable {
    /// Creates a new table with the given maximum size in bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            arena: Slab::new(),
            fifo: VecDeque::new(),
            by_name: HashMap::new(),
            next_seq: 0,
            current_size: 0,
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    pub fn current_size(&self) -> usize {
        self.current_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Gets an entry by 1-based dynamic index (1 = most recent).
    pub fn get(&self, index: usize) -> Option<&HeaderEntry> {
        let handle = index.checked_sub(1).and_then(|i| self.fifo.get(i))?;
        self.entry(*handle)
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

    /// Handles of all live entries with this name, most recent first.
    pub fn get_by_name(&self, name: &str) -> Option<&VecDeque<EntryHandle>> {
        self.by_name.get(name)
    }

    /// Returns the entry behind `handle`, or None once it has been evicted.
    pub fn entry(&self, handle: EntryHandle) -> Option<&HeaderEntry> {
        self.arena
            .get(handle.key)
            .filter(|node| node.seq == handle.seq)
            .map(|node| &node.entry)
    }

    /// Current 1-based dynamic index of `handle`, or None once evicted.
    pub fn dynamic_index(&self, handle: EntryHandle) -> Option<usize> {
        self.entry(handle)?;
        let oldest = self.fifo.back()?.seq;
        Some(self.len() - (handle.seq - oldest) as usize)
    }

    /// Combined index of the most recent entry matching name and value.
    pub fn find_exact(&self, name: &str, value: &str) -> Option<usize> {
        self.get_by_name(name)?
            .iter()
            .find(|handle| self.entry(**handle).map_or(false, |e| e.value() == value))
            .and_then(|handle| self.dynamic_index(*handle))
            .map(|index| static_table::len() + index)
    }

    /// Combined index of the most recent entry with this name.
    pub fn find_name(&self, name: &str) -> Option<usize> {
        let handle = self.get_by_name(name)?.front()?;
        self.dynamic_index(*handle)
            .map(|index| static_table::len() + index)
    }

    /// Inserts an entry, evicting the oldest ones to stay within budget.
    ///
    /// Returns the new entry's handle, or None if the entry was larger than
    /// the table, in which case the table is emptied (RFC 7541 Section 4.4).
    pub fn add(&mut self, entry: HeaderEntry) -> Option<EntryHandle> {
        let size = entry.total_size();
        if size > self.max_size {
            self.clear();
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let name = entry.name().to_owned();
        let key = self.arena.insert(Node { entry, seq });
        let handle = EntryHandle { key, seq };

        self.fifo.push_front(handle);
        self.by_name.entry(name).or_default().push_front(handle);
        self.current_size += size;

        self.evict();
        Some(handle)
    }

    /// Sets a new maximum size, evicting entries if necessary.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.evict();
    }

    /// Removes every entry. Outstanding handles stop resolving.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.fifo.clear();
        self.by_name.clear();
        self.current_size = 0;
    }

    fn evict(&mut self) {
        while self.current_size > self.max_size {
            if self.remove_last().is_none() {
                debug_assert_eq!(self.current_size, 0, "size accounting drifted");
                self.current_size = 0;
                break;
            }
        }
    }

    fn remove_last(&mut self) -> Option<HeaderEntry> {
        let handle = self.fifo.pop_back()?;
        let node = self.arena.remove(handle.key);
        self.current_size -= node.entry.total_size();

        if let Some(handles) = self.by_name.get_mut(node.entry.name()) {
            // The oldest entry is also the oldest of its name
            let removed = handles.pop_back();
            debug_assert_eq!(removed, Some(handle));
            if handles.is_empty() {
                self.by_name.remove(node.entry.name());
            }
        }

        Some(node.entry)
    }
}

impl Default for EncoderDynamicTable {
    /// An unbounded table, for use before any limit has been negotiated.
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}
