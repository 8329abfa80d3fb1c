//! HPACK decoder.
//!
//! Decodes header blocks per RFC 7541 Section 6, maintaining the decoder's
//! view of the dynamic table across blocks.

use tracing::{debug, trace, warn};

use crate::{
    config::HpackConfig,
    dynamic_table::DynamicTable,
    error::{Error, Result},
    header::{HeaderEntry, HeaderField},
    integer,
    representation::Representation,
    string::StringCodec,
};

/// HPACK decoder.
///
/// One per connection. Header blocks must be decoded in the order they were
/// received, since each may modify the dynamic table.
#[derive(Debug)]
pub struct Decoder {
    table: DynamicTable,
    strings: StringCodec,
    /// Upper bound for size updates sent by the peer.
    max_table_size: usize,
    max_list_size: Option<usize>,
}

impl Decoder {
    /// Creates a new decoder from `config`.
    pub fn new(config: &HpackConfig) -> Self {
        Self::with_table(config, DynamicTable::new(config.max_table_size))
    }

    /// Creates a decoder around an existing dynamic table.
    pub fn with_table(config: &HpackConfig, table: DynamicTable) -> Self {
        Self {
            table,
            strings: StringCodec::new(config.charset),
            max_table_size: config.max_table_size,
            max_list_size: config.max_header_list_size,
        }
    }

    /// The decoder's dynamic table.
    pub fn table(&self) -> &DynamicTable {
        &self.table
    }

    /// Current limit for peer size updates.
    pub fn max_table_size(&self) -> usize {
        self.max_table_size
    }

    pub fn max_list_size(&self) -> Option<usize> {
        self.max_list_size
    }

    /// Sets the limit for dynamic table size updates sent by the peer.
    ///
    /// Mirrors a change to our SETTINGS_HEADER_TABLE_SIZE. The table itself
    /// only shrinks once the peer acknowledges the change with a size update.
    pub fn set_max_table_size(&mut self, max_table_size: usize) {
        debug!(
            "Decoder max table size: {} -> {}",
            self.max_table_size, max_table_size
        );
        self.max_table_size = max_table_size;
    }

    /// Sets the header list size limit, or removes it with `None`.
    pub fn set_max_list_size(&mut self, max_list_size: Option<usize>) {
        debug!("Decoder max header list size: {:?}", max_list_size);
        self.max_list_size = max_list_size;
    }

    /// Decodes a complete header block.
    ///
    /// Dynamic table size updates are applied wherever they appear in the
    /// block, including after header fields. RFC 7541 Section 4.2 only
    /// allows them at the start; this decoder does not reject late ones.
    ///
    /// Any error leaves the dynamic table in an unspecified state and must be
    /// treated as a connection error.
    pub fn decode_headers(&mut self, data: &[u8]) -> Result<Vec<HeaderField>> {
        let mut headers = Vec::new();
        let mut list_size = 0usize;
        let mut pos = 0;

        while pos < data.len() {
            let (entry, consumed) = self.decode_field(&data[pos..])?;
            pos += consumed;

            let Some(entry) = entry else {
                continue;
            };

            list_size = list_size.saturating_add(entry.total_size());
            if let Some(limit) = self.max_list_size {
                if list_size >= limit {
                    warn!(
                        "Header list size limit reached: {} >= {}",
                        list_size, limit
                    );
                    return Err(Error::HeaderListSizeExceeded {
                        size: list_size,
                        limit,
                    });
                }
            }

            headers.push(HeaderField::from(entry));
        }

        trace!(
            "Decoded {} headers from {} bytes, table {}/{} bytes in {} entries",
            headers.len(),
            data.len(),
            self.table.current_size(),
            self.table.max_size(),
            self.table.len()
        );

        Ok(headers)
    }

    /// Decodes one representation from the front of `data`.
    ///
    /// Returns `None` in place of an entry for a size update.
    fn decode_field(&mut self, data: &[u8]) -> Result<(Option<HeaderEntry>, usize)> {
        let first = *data.first().ok_or(Error::UnexpectedEndOfStream)?;
        let repr = Representation::classify(first);

        match repr {
            Representation::Indexed => {
                let (index, consumed) = integer::decode(repr.prefix_bits(), data)?;
                let entry = self.table.get_header(index)?.clone();
                Ok((Some(entry), consumed))
            }

            Representation::SizeUpdate => {
                let (size, consumed) = integer::decode(repr.prefix_bits(), data)?;
                self.update_table_size(size);
                Ok((None, consumed))
            }

            Representation::LiteralWithIndexing
            | Representation::LiteralWithoutIndexing
            | Representation::LiteralNeverIndexed => {
                let (entry, consumed) = self.decode_literal(repr, data)?;
                if repr == Representation::LiteralWithIndexing {
                    self.table.add(entry.clone());
                }
                Ok((Some(entry), consumed))
            }
        }
    }

    fn decode_literal(&mut self, repr: Representation, data: &[u8]) -> Result<(HeaderEntry, usize)> {
        let (name_index, mut pos) = integer::decode(repr.prefix_bits(), data)?;

        let (name, name_len) = if name_index == 0 {
            let (name, consumed) = self.strings.decode(&data[pos..])?;
            pos += consumed;
            (name.value, name.octets)
        } else {
            let entry = self.table.get_header(name_index)?;
            (entry.name().to_owned(), entry.name_len())
        };

        let (value, consumed) = self.strings.decode(&data[pos..])?;
        pos += consumed;

        let entry = HeaderEntry::with_lengths(
            name,
            name_len,
            value.value,
            value.octets,
            repr == Representation::LiteralNeverIndexed,
        );
        Ok((entry, pos))
    }

    fn update_table_size(&mut self, requested: usize) {
        let size = if requested > self.max_table_size {
            warn!(
                "Peer table size update {} above limit {}, clamping",
                requested, self.max_table_size
            );
            self.max_table_size
        } else {
            requested
        };

        debug!(
            "Dynamic table size update: {} -> {}",
            self.table.max_size(),
            size
        );
        self.table.set_max_size(size);
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(&HpackConfig::default())
    }
}
