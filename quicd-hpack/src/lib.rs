//! HPACK: Header Compression for HTTP/2 (RFC 7541)
//!
//! This crate provides the header compression layer of an HTTP/2 connection:
//! a stateful [`Encoder`] that turns header lists into header block
//! fragments and a matching [`Decoder`] that turns them back. It does no I/O
//! and knows nothing about frames; the connection layer hands it complete
//! header blocks.
//!
//! # Features
//!
//! - **RFC 7541 wire format**: all four field representations plus dynamic
//!   table size updates, the Appendix A static table and Appendix B Huffman
//!   code.
//! - **Bounded decoding**: integers are capped at 2^31 - 1 and an optional
//!   header list size limit stops oversized blocks early.
//! - **Sensitive fields**: fields marked sensitive are always sent as
//!   "never indexed" and are decoded with the flag preserved.
//!
//! # Example
//!
//! ```rust
//! use quicd_hpack::{Decoder, Encoder, HeaderField, HpackConfig};
//!
//! let config = HpackConfig::default();
//! let mut encoder = Encoder::new(&config);
//! let mut decoder = Decoder::new(&config);
//!
//! let headers = vec![
//!     HeaderField::new(":method", "GET"),
//!     HeaderField::new(":path", "/"),
//!     HeaderField::sensitive("authorization", "Bearer token"),
//! ];
//! let block = encoder.encode(&headers).unwrap();
//!
//! let decoded = decoder.decode_headers(&block).unwrap();
//! assert_eq!(decoded, headers);
//! ```
//!
//! Every [`Error`] is a connection error of type `COMPRESSION_ERROR`; see
//! [`Error::error_code`].

pub mod config;
pub mod decoder;
pub mod dynamic_table;
pub mod encoder;
pub mod encoder_table;
pub mod error;
mod fifo;
pub mod header;
pub mod huffman;
pub mod integer;
pub mod representation;
pub mod static_table;
pub mod string;

// Re-export main types
pub use config::HpackConfig;
pub use decoder::Decoder;
pub use dynamic_table::DynamicTable;
pub use encoder::Encoder;
pub use encoder_table::{EncoderDynamicTable, EntryHandle};
pub use error::{Error, Result, COMPRESSION_ERROR};
pub use header::{HeaderEntry, HeaderField};
pub use representation::Representation;
pub use string::Charset;
