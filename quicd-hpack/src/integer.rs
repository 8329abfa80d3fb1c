//! Prefix integer encoding and decoding.
//!
//! Implements the variable-length integer encoding defined in RFC 7541 Section 5.1.
//! Indexes, string lengths and table size updates all share this format, each
//! with its own prefix width.
//!
//! ## Format
//!
//! An integer is represented in two parts:
//! - A prefix that fills the remainder of a byte (N bits, where 1 ≤ N ≤ 8)
//! - Optional continuation bytes if the value doesn't fit in the prefix
//!
//! If I < 2^N - 1, the integer is encoded in the N-bit prefix.
//! Otherwise, the prefix bits are all set to 1, and `I - (2^N - 1)` follows as
//! little-endian 7-bit groups, each but the last carrying the 0x80 flag.
//!
//! Decoded values are capped at 2^31 - 1; nothing in HPACK legitimately needs
//! more, and the cap bounds the work a peer can make us do.

use bytes::BufMut;

use crate::error::{Error, Result};

/// Largest integer the decoder accepts (2^31 - 1).
pub const MAX_INTEGER: usize = i32::MAX as usize;

/// Continuation groups needed to carry any value up to [`MAX_INTEGER`].
const MAX_CONTINUATION_GROUPS: u32 = 5;

#[inline]
fn prefix_mask(prefix_bits: u8) -> u8 {
    debug_assert!((1..=8).contains(&prefix_bits));
    // Avoid shift overflow when prefix_bits == 8
    if prefix_bits == 8 {
        0xFF
    } else {
        (1u8 << prefix_bits) - 1
    }
}

/// Encodes an integer with an N-bit prefix.
///
/// `flags` supplies the bits of the first byte above the prefix (the
/// representation pattern, or the Huffman flag for string lengths).
///
/// # Example
///
/// ```
/// use bytes::BytesMut;
/// use quicd_hpack::integer::encode;
///
/// let mut buf = BytesMut::new();
/// // RFC 7541 C.1.2: 1337 with a 5-bit prefix
/// encode(1337, 5, 0, &mut buf);
/// assert_eq!(&buf[..], &[0x1f, 0x9a, 0x0a]);
/// ```
pub fn encode<B: BufMut>(value: usize, prefix_bits: u8, flags: u8, dst: &mut B) {
    let max_prefix = prefix_mask(prefix_bits) as usize;

    if value < max_prefix {
        dst.put_u8(flags | value as u8);
        return;
    }

    dst.put_u8(flags | max_prefix as u8);
    let mut remaining = value - max_prefix;
    while remaining >= 0x80 {
        dst.put_u8(0x80 | (remaining & 0x7F) as u8);
        remaining >>= 7;
    }
    dst.put_u8(remaining as u8);
}

/// Decodes an integer with an N-bit prefix.
///
/// Bits of the first byte above the prefix are ignored.
///
/// # Returns
///
/// A tuple of (decoded value, number of bytes consumed).
///
/// # Errors
///
/// * [`Error::UnexpectedEndOfStream`] if `data` ends mid-integer.
/// * [`Error::IntegerLimitExceeded`] if the value exceeds [`MAX_INTEGER`] or
///   needs more than five continuation bytes.
///
/// # Example
///
/// ```
/// use quicd_hpack::integer::decode;
///
/// let (value, consumed) = decode(5, &[0b001_01010]).unwrap();
/// assert_eq!(value, 10);
/// assert_eq!(consumed, 1);
/// ```
pub fn decode(prefix_bits: u8, data: &[u8]) -> Result<(usize, usize)> {
    let first = *data.first().ok_or(Error::UnexpectedEndOfStream)?;
    let mask = prefix_mask(prefix_bits);
    let mut value = (first & mask) as u64;

    if value < mask as u64 {
        return Ok((value as usize, 1));
    }

    let mut pos = 1;
    let mut groups = 0u32;

    loop {
        if groups == MAX_CONTINUATION_GROUPS {
            return Err(Error::IntegerLimitExceeded);
        }

        let byte = *data.get(pos).ok_or(Error::UnexpectedEndOfStream)?;
        pos += 1;

        value += ((byte & 0x7F) as u64) << (7 * groups);
        if value > MAX_INTEGER as u64 {
            return Err(Error::IntegerLimitExceeded);
        }
        groups += 1;

        if byte & 0x80 == 0 {
            break;
        }
    }

    Ok((value as usize, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encoded(value: usize, prefix_bits: u8) -> BytesMut {
        let mut buf = BytesMut::new();
        encode(value, prefix_bits, 0, &mut buf);
        buf
    }

    #[test]
    fn test_rfc_example_10() {
        // RFC 7541 C.1.1: Encoding 10 with 5-bit prefix
        assert_eq!(&encoded(10, 5)[..], &[0x0a]);
    }

    #[test]
    fn test_rfc_example_1337() {
        // RFC 7541 C.1.2: Encoding 1337 with 5-bit prefix
        let buf = encoded(1337, 5);
        assert_eq!(&buf[..], &[0x1f, 0x9a, 0x0a]);

        let (value, consumed) = decode(5, &buf).unwrap();
        assert_eq!(value, 1337);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_rfc_example_42() {
        // RFC 7541 C.1.3: Encoding 42 starting at an octet boundary
        assert_eq!(&encoded(42, 8)[..], &[0x2a]);
    }

    #[test]
    fn test_flags_preserved() {
        let mut buf = BytesMut::new();
        encode(10, 5, 0b001_00000, &mut buf);
        assert_eq!(&buf[..], &[0b001_01010]);

        // 62 still fits a 6-bit prefix; 63 fills it
        let mut buf = BytesMut::new();
        encode(62, 6, 0x40, &mut buf);
        assert_eq!(&buf[..], &[0x7e]);

        let mut buf = BytesMut::new();
        encode(63, 6, 0x40, &mut buf);
        assert_eq!(&buf[..], &[0x7f, 0x00]);
    }

    #[test]
    fn test_decode_ignores_flag_bits() {
        let (value, consumed) = decode(7, &[0x82]).unwrap();
        assert_eq!(value, 2);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_prefix_boundary() {
        // 31 with a 5-bit prefix needs a zero continuation byte
        let buf = encoded(31, 5);
        assert_eq!(&buf[..], &[0x1f, 0x00]);
        assert_eq!(decode(5, &buf).unwrap(), (31, 2));
    }

    #[test]
    fn test_round_trip_prefix_widths() {
        for prefix_bits in 4..=8 {
            for value in [0usize, 1, 14, 15, 30, 127, 128, 255, 1337, 65_535, MAX_INTEGER] {
                let buf = encoded(value, prefix_bits);
                let (decoded, consumed) = decode(prefix_bits, &buf).unwrap();
                assert_eq!(decoded, value, "value {} prefix {}", value, prefix_bits);
                assert_eq!(consumed, buf.len());
            }
        }
    }

    #[test]
    fn test_max_integer_accepted() {
        let buf = encoded(MAX_INTEGER, 5);
        assert_eq!(buf.len(), 6);
        assert_eq!(decode(5, &buf).unwrap(), (MAX_INTEGER, 6));
    }

    #[test]
    fn test_extra_continuation_group_rejected() {
        let mut buf = encoded(MAX_INTEGER, 5).to_vec();
        let last = buf.len() - 1;
        buf[last] |= 0x80;
        buf.push(0x00);
        assert_eq!(decode(5, &buf), Err(Error::IntegerLimitExceeded));
    }

    #[test]
    fn test_value_above_limit_rejected() {
        let buf = encoded(MAX_INTEGER + 1, 5);
        assert_eq!(decode(5, &buf), Err(Error::IntegerLimitExceeded));
    }

    #[test]
    fn test_incomplete_data() {
        assert_eq!(decode(5, &[]), Err(Error::UnexpectedEndOfStream));
        assert_eq!(decode(5, &[0xFF]), Err(Error::UnexpectedEndOfStream));
        assert_eq!(decode(5, &[0x1F, 0x9A]), Err(Error::UnexpectedEndOfStream));
    }

    #[test]
    fn test_round_trip_property() {
        use proptest::prelude::*;

        proptest!(|(value in 0usize..=MAX_INTEGER, prefix_bits in 1u8..=8)| {
            let buf = encoded(value, prefix_bits);
            let (decoded, consumed) = decode(prefix_bits, &buf).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(consumed, buf.len());
        });
    }
}
