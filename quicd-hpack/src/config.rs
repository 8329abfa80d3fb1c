//! HPACK codec configuration.
//!
//! Both [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder) are built
//! from an [`HpackConfig`]. The struct deserializes from any serde format so
//! it can sit inside a larger connection or server config file.

use serde::{Deserialize, Serialize};

use crate::integer::MAX_INTEGER;
use crate::string::Charset;

/// Default dynamic table size (RFC 7540 SETTINGS_HEADER_TABLE_SIZE initial value).
pub const DEFAULT_MAX_TABLE_SIZE: usize = 4096;

/// Configuration shared by the HPACK encoder and decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HpackConfig {
    /// Maximum dynamic table size in bytes.
    ///
    /// For a decoder this is the limit advertised to the peer; size updates
    /// above it are clamped. For an encoder it is the initial table size.
    ///
    /// **Default:** `4096`
    pub max_table_size: usize,

    /// Maximum size of a decoded header list, counted as the sum of entry
    /// sizes (name + value + 32). `None` disables the check.
    ///
    /// **Default:** `None`
    pub max_header_list_size: Option<usize>,

    /// Huffman-code string literals when that makes them shorter.
    ///
    /// Only consulted by [`Encoder::encode`](crate::Encoder::encode).
    ///
    /// **Default:** `true`
    pub use_huffman: bool,

    /// Character set used to map header octets to strings.
    ///
    /// **Default:** `latin1`
    pub charset: Charset,
}

impl Default for HpackConfig {
    fn default() -> Self {
        Self {
            max_table_size: DEFAULT_MAX_TABLE_SIZE,
            max_header_list_size: None,
            use_huffman: true,
            charset: Charset::Latin1,
        }
    }
}

impl HpackConfig {
    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Size updates carry the table size as an HPACK integer
        if self.max_table_size > MAX_INTEGER {
            errors.push(format!(
                "max_table_size {} exceeds the largest encodable size {}",
                self.max_table_size, MAX_INTEGER
            ));
        }

        if self.max_header_list_size == Some(0) {
            errors.push("max_header_list_size must be greater than 0 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
