//! HPACK encoder.
//!
//! Encodes header lists per RFC 7541 Section 6, maintaining the encoder's
//! dynamic table across blocks.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::{
    config::HpackConfig,
    encoder_table::EncoderDynamicTable,
    error::Result,
    header::{HeaderEntry, HeaderField},
    integer,
    representation::Representation,
    static_table,
    string::StringCodec,
};

/// HPACK encoder.
///
/// One per connection, paired with the peer's decoder. Blocks must be sent
/// in the order they were encoded.
#[derive(Debug)]
pub struct Encoder {
    table: EncoderDynamicTable,
    strings: StringCodec,
    use_huffman: bool,
    /// Smallest size set since the last block.
    pending_min: Option<usize>,
    /// Last size set since the last block.
    pending_final: Option<usize>,
}

impl Encoder {
    /// Creates a new encoder from `config`.
    pub fn new(config: &HpackConfig) -> Self {
        Self::with_table(config, EncoderDynamicTable::new(config.max_table_size))
    }

    /// Creates an encoder around an existing dynamic table.
    pub fn with_table(config: &HpackConfig, table: EncoderDynamicTable) -> Self {
        Self {
            table,
            strings: StringCodec::new(config.charset),
            use_huffman: config.use_huffman,
            pending_min: None,
            pending_final: None,
        }
    }

    /// The encoder's dynamic table.
    pub fn table(&self) -> &EncoderDynamicTable {
        &self.table
    }

    /// Whether a size update will be emitted before the next block.
    pub fn has_pending_size_update(&self) -> bool {
        self.pending_final.is_some()
    }

    /// Changes the dynamic table size, evicting entries if necessary.
    ///
    /// Call this when the peer's SETTINGS_HEADER_TABLE_SIZE changes. The
    /// matching size update instructions are written at the start of the
    /// next header block: the smallest size set in the meantime, if lower,
    /// followed by the final one (RFC 7541 Section 4.2).
    pub fn set_max_table_size(&mut self, max_table_size: usize) {
        debug!(
            "Encoder max table size: {} -> {}",
            self.table.max_size(),
            max_table_size
        );
        self.table.set_max_size(max_table_size);
        self.pending_min = Some(
            self.pending_min
                .map_or(max_table_size, |min| min.min(max_table_size)),
        );
        self.pending_final = Some(max_table_size);
    }

    /// Changes the table size and writes the size update right away.
    pub fn encode_table_size_update(&mut self, dst: &mut BytesMut, max_table_size: usize) {
        self.set_max_table_size(max_table_size);
        self.flush_size_updates(dst);
    }

    /// Encodes a header list as one header block using the configured
    /// Huffman setting.
    pub fn encode(&mut self, headers: &[HeaderField]) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.encode_headers(&mut dst, headers, false, self.use_huffman)?;
        Ok(dst.freeze())
    }

    /// Encodes a header list, appending to `dst`.
    ///
    /// Headers are encoded in order; nothing is reordered or merged.
    /// `no_indexing` keeps every field out of the dynamic table, and
    /// sensitive fields always use the never-indexed representation.
    ///
    /// Every field is checked against the charset first, so on error
    /// neither `dst` nor the dynamic table has been modified.
    pub fn encode_headers(
        &mut self,
        dst: &mut BytesMut,
        headers: &[HeaderField],
        no_indexing: bool,
        use_huffman: bool,
    ) -> Result<()> {
        let charset = self.strings.charset();
        for field in headers {
            charset.check_encodable(&field.name)?;
            charset.check_encodable(&field.value)?;
        }

        let start = dst.len();
        self.flush_size_updates(dst);
        for field in headers {
            self.encode_field(dst, field, no_indexing, use_huffman)?;
        }

        trace!(
            "Encoded {} headers into {} bytes, table {}/{} bytes in {} entries",
            headers.len(),
            dst.len() - start,
            self.table.current_size(),
            self.table.max_size(),
            self.table.len()
        );
        Ok(())
    }

    /// Encodes a single header, appending to `dst`.
    ///
    /// Pending size updates are written first, so a block may be built one
    /// header at a time.
    pub fn encode_header(
        &mut self,
        dst: &mut BytesMut,
        field: &HeaderField,
        no_indexing: bool,
        use_huffman: bool,
    ) -> Result<()> {
        self.encode_headers(dst, std::slice::from_ref(field), no_indexing, use_huffman)
    }

    fn flush_size_updates(&mut self, dst: &mut BytesMut) {
        let Some(last) = self.pending_final.take() else {
            return;
        };
        let min = self.pending_min.take().unwrap_or(last);

        let repr = Representation::SizeUpdate;
        if min < last {
            integer::encode(min, repr.prefix_bits(), repr.pattern(), dst);
        }
        integer::encode(last, repr.prefix_bits(), repr.pattern(), dst);
    }

    fn encode_field(
        &mut self,
        dst: &mut BytesMut,
        field: &HeaderField,
        no_indexing: bool,
        use_huffman: bool,
    ) -> Result<()> {
        let repr = if field.sensitive {
            Representation::LiteralNeverIndexed
        } else if no_indexing {
            Representation::LiteralWithoutIndexing
        } else {
            Representation::LiteralWithIndexing
        };
        let indexing = repr == Representation::LiteralWithIndexing;

        if indexing {
            let exact = static_table::find_exact(&field.name, &field.value)
                .or_else(|| self.table.find_exact(&field.name, &field.value));
            if let Some(index) = exact {
                let indexed = Representation::Indexed;
                integer::encode(index, indexed.prefix_bits(), indexed.pattern(), dst);
                return Ok(());
            }
        }

        let name_index =
            static_table::find_name(&field.name).or_else(|| self.table.find_name(&field.name));

        let name_len = match name_index {
            Some(index) => {
                integer::encode(index, repr.prefix_bits(), repr.pattern(), dst);
                self.strings.charset().encoded_len(&field.name)
            }
            None => {
                integer::encode(0, repr.prefix_bits(), repr.pattern(), dst);
                self.strings.encode(&field.name, use_huffman, dst)?
            }
        };
        let value_len = self.strings.encode(&field.value, use_huffman, dst)?;

        if indexing {
            self.table.add(HeaderEntry::with_lengths(
                field.name.clone(),
                name_len,
                field.value.clone(),
                value_len,
                false,
            ));
        }
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(&HpackConfig::default())
    }
}
