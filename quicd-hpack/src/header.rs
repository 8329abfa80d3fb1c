//! Header field representation.
//!
//! [`HeaderField`] is what callers hand to the encoder and get back from the
//! decoder. [`HeaderEntry`] is what the tables hold: the same pair plus the
//! octet lengths of its wire form, which drive size accounting.

use std::fmt;

/// Per-entry overhead added to the octet lengths (RFC 7541 Section 4.1).
pub const ENTRY_OVERHEAD: usize = 32;

/// An HTTP header field (name-value pair).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
    /// Must never be added to any dynamic table, here or by intermediaries.
    pub sensitive: bool,
}

impl HeaderField {
    /// Creates a new, non-sensitive header field.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: false,
        }
    }

    /// Creates a header field that is encoded as "never indexed".
    pub fn sensitive(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: true,
        }
    }
}

impl fmt::Debug for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sensitive {
            write!(f, "HeaderField({:?}: <sensitive>)", self.name)
        } else {
            write!(f, "HeaderField({:?}: {:?})", self.name, self.value)
        }
    }
}

impl From<(&str, &str)> for HeaderField {
    fn from((name, value): (&str, &str)) -> Self {
        Self::new(name, value)
    }
}

impl From<&HeaderEntry> for HeaderField {
    fn from(entry: &HeaderEntry) -> Self {
        Self {
            name: entry.name.clone(),
            value: entry.value.clone(),
            sensitive: entry.sensitive,
        }
    }
}

impl From<HeaderEntry> for HeaderField {
    fn from(entry: HeaderEntry) -> Self {
        Self {
            name: entry.name,
            value: entry.value,
            sensitive: entry.sensitive,
        }
    }
}

/// A header as stored in the static or dynamic table.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    name_len: usize,
    value: String,
    value_len: usize,
    sensitive: bool,
}

impl HeaderEntry {
    /// Creates an entry whose octet lengths are the UTF-8 lengths of the strings.
    ///
    /// Exact for ASCII names and values, which covers the static table.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        Self {
            name_len: name.len(),
            value_len: value.len(),
            name,
            value,
            sensitive: false,
        }
    }

    /// Creates an entry with explicit wire octet lengths.
    pub fn with_lengths(
        name: impl Into<String>,
        name_len: usize,
        value: impl Into<String>,
        value_len: usize,
        sensitive: bool,
    ) -> Self {
        Self {
            name: name.into(),
            name_len,
            value: value.into(),
            value_len,
            sensitive,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn name_len(&self) -> usize {
        self.name_len
    }

    pub fn value_len(&self) -> usize {
        self.value_len
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Size of this entry for dynamic table accounting.
    ///
    /// Per RFC 7541 Section 4.1: size = name_len + value_len + 32
    pub fn total_size(&self) -> usize {
        self.name_len + self.value_len + ENTRY_OVERHEAD
    }
}
