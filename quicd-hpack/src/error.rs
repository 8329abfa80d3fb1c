//! Error types for HPACK operations.
//!
//! Every error in this module is fatal for the connection that produced it:
//! the encoder and decoder dynamic tables are shared protocol state, so once
//! a header block fails to decode the two peers can no longer agree on table
//! contents. RFC 7540 Section 4.3 requires such failures to be treated as a
//! connection error of type `COMPRESSION_ERROR`.

use thiserror::Error;

/// HTTP/2 `COMPRESSION_ERROR` error code (RFC 7540 Section 7).
pub const COMPRESSION_ERROR: u32 = 0x9;

/// Result type for HPACK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during HPACK operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer ended before a complete integer, string or header field
    /// representation could be decoded.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// A variable-length integer exceeds the accepted range (2^31 - 1).
    #[error("integer limit exceeded")]
    IntegerLimitExceeded,

    /// Huffman padding is longer than 7 bits or is not a prefix of EOS.
    ///
    /// RFC 7541 Section 5.2.
    #[error("invalid huffman padding")]
    InvalidHuffmanPadding,

    /// The EOS symbol appeared inside a Huffman-coded string.
    #[error("EOS symbol decoded literally")]
    EosDecodedLiterally,

    /// An indexed reference falls outside `1..=static_len + dynamic_len`.
    #[error("invalid table index: {0}")]
    InvalidTableIndex(usize),

    /// The decoded header list outgrew the configured limit.
    #[error("header list size {size} exceeds limit {limit}")]
    HeaderListSizeExceeded { size: usize, limit: usize },

    /// String octets could not be transcoded under the configured charset.
    #[error("character coding error: {0}")]
    CharacterCoding(String),

    /// The Huffman code table does not describe a valid prefix code.
    #[error("malformed huffman table: {0}")]
    MalformedHuffmanTable(String),
}

impl Error {
    /// Returns the HTTP/2 error code for this error.
    ///
    /// All HPACK failures map to `COMPRESSION_ERROR`.
    pub fn error_code(&self) -> u32 {
        COMPRESSION_ERROR
    }

    /// Returns true if the input was merely truncated.
    ///
    /// Still fatal once a complete header block has been handed to the
    /// decoder, but useful to tell framing bugs apart from hostile input.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::UnexpectedEndOfStream)
    }
}
