//! Header field representations per RFC 7541 Section 6.
//!
//! ```text
//! 1xxxxxxx  Indexed Header Field                (7-bit index)
//! 01xxxxxx  Literal With Incremental Indexing   (6-bit name index)
//! 001xxxxx  Dynamic Table Size Update           (5-bit max size)
//! 0001xxxx  Literal Never Indexed               (4-bit name index)
//! 0000xxxx  Literal Without Indexing            (4-bit name index)
//! ```

/// The kind of representation a header block byte starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    Indexed,
    LiteralWithIndexing,
    SizeUpdate,
    LiteralNeverIndexed,
    LiteralWithoutIndexing,
}

impl Representation {
    /// Classifies the first byte of a representation.
    ///
    /// Every byte value maps to exactly one representation.
    pub fn classify(first: u8) -> Self {
        if first & 0x80 != 0 {
            Representation::Indexed
        } else if first & 0xC0 == 0x40 {
            Representation::LiteralWithIndexing
        } else if first & 0xE0 == 0x20 {
            Representation::SizeUpdate
        } else if first & 0xF0 == 0x10 {
            Representation::LiteralNeverIndexed
        } else {
            Representation::LiteralWithoutIndexing
        }
    }

    /// Bit pattern that marks this representation in the first byte.
    pub fn pattern(self) -> u8 {
        match self {
            Representation::Indexed => 0x80,
            Representation::LiteralWithIndexing => 0x40,
            Representation::SizeUpdate => 0x20,
            Representation::LiteralNeverIndexed => 0x10,
            Representation::LiteralWithoutIndexing => 0x00,
        }
    }

    /// Width of the integer prefix following the pattern bits.
    pub fn prefix_bits(self) -> u8 {
        match self {
            Representation::Indexed => 7,
            Representation::LiteralWithIndexing => 6,
            Representation::SizeUpdate => 5,
            Representation::LiteralNeverIndexed | Representation::LiteralWithoutIndexing => 4,
        }
    }
}
