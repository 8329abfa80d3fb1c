//! String literal encoding and decoding (RFC 7541 Section 5.2).
//!
//! ```text
//!   0   1   2   3   4   5   6   7
//! +---+---+---+---+---+---+---+---+
//! | H |    String Length (7+)     |
//! +---+---------------------------+
//! |  String Data (Length octets)  |
//! +-------------------------------+
//! ```
//!
//! Octets are mapped to and from Rust strings through a [`Charset`].

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{huffman, integer};

/// Huffman flag in the first byte of a string literal.
const HUFFMAN_FLAG: u8 = 0x80;

/// Character set used to transcode header octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// One octet per character. Every octet decodes; characters above
    /// U+00FF cannot be encoded.
    #[default]
    Latin1,
    /// UTF-8; invalid sequences fail to decode.
    Utf8,
}

impl Charset {
    /// Decodes wire octets into a string.
    pub fn decode(self, octets: &[u8]) -> Result<String> {
        match self {
            Charset::Latin1 => Ok(octets.iter().map(|&b| b as char).collect()),
            Charset::Utf8 => std::str::from_utf8(octets)
                .map(str::to_owned)
                .map_err(|e| Error::CharacterCoding(e.to_string())),
        }
    }

    /// Checks that every character of `s` can be encoded.
    pub fn check_encodable(self, s: &str) -> Result<()> {
        match self {
            Charset::Latin1 => match s.chars().find(|&c| c as u32 > 0xFF) {
                Some(c) => Err(Error::CharacterCoding(format!(
                    "character {:?} is not representable in Latin-1",
                    c
                ))),
                None => Ok(()),
            },
            Charset::Utf8 => Ok(()),
        }
    }

    /// Encodes a string into wire octets, appending to `dst`.
    pub fn encode(self, s: &str, dst: &mut Vec<u8>) -> Result<()> {
        self.check_encodable(s)?;
        match self {
            Charset::Latin1 => dst.extend(s.chars().map(|c| c as u8)),
            Charset::Utf8 => dst.extend_from_slice(s.as_bytes()),
        }
        Ok(())
    }

    /// Number of octets `s` occupies on the wire.
    ///
    /// Only meaningful for strings that [`Charset::encode`] accepts.
    pub fn encoded_len(self, s: &str) -> usize {
        match self {
            Charset::Latin1 => s.chars().count(),
            Charset::Utf8 => s.len(),
        }
    }
}

/// A decoded string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedString {
    pub value: String,
    /// Octet length after Huffman decoding, before transcoding.
    pub octets: usize,
}

/// String literal codec with reusable scratch buffers.
///
/// The scratch buffers keep their capacity across calls but are cleared
/// after each one, so no decoded content outlives the call that produced it.
#[derive(Debug, Default)]
pub struct StringCodec {
    charset: Charset,
    scratch: Vec<u8>,
}

impl StringCodec {
    pub fn new(charset: Charset) -> Self {
        Self {
            charset,
            scratch: Vec::new(),
        }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Decodes a string literal from the front of `data`.
    ///
    /// # Returns
    ///
    /// The decoded string and the number of bytes consumed.
    pub fn decode(&mut self, data: &[u8]) -> Result<(DecodedString, usize)> {
        let first = *data.first().ok_or(Error::UnexpectedEndOfStream)?;
        let (len, consumed) = integer::decode(7, data)?;

        let end = consumed
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or(Error::UnexpectedEndOfStream)?;
        let raw = &data[consumed..end];

        let decoded = if first & HUFFMAN_FLAG != 0 {
            self.scratch.clear();
            let result = huffman::decode(raw, &mut self.scratch).and_then(|()| {
                Ok(DecodedString {
                    value: self.charset.decode(&self.scratch)?,
                    octets: self.scratch.len(),
                })
            });
            self.scratch.clear();
            result?
        } else {
            DecodedString {
                value: self.charset.decode(raw)?,
                octets: len,
            }
        };

        Ok((decoded, end))
    }

    /// Encodes `s` as a string literal, appending to `dst`.
    ///
    /// With `use_huffman`, Huffman coding is used only when it is strictly
    /// shorter than the plain octets.
    ///
    /// # Returns
    ///
    /// The octet length of `s` under the configured charset.
    pub fn encode<B: BufMut>(&mut self, s: &str, use_huffman: bool, dst: &mut B) -> Result<usize> {
        self.scratch.clear();
        let result = self.charset.encode(s, &mut self.scratch).map(|()| {
            let octets = self.scratch.len();
            let huffman_len = if use_huffman {
                huffman::encoded_len(&self.scratch)
            } else {
                usize::MAX
            };

            if huffman_len < octets {
                integer::encode(huffman_len, 7, HUFFMAN_FLAG, dst);
                huffman::encode(&self.scratch, dst);
            } else {
                integer::encode(octets, 7, 0, dst);
                dst.put_slice(&self.scratch);
            }
            octets
        });
        self.scratch.clear();
        result
    }
}
