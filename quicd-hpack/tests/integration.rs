//! Integration tests for the HPACK encoder/decoder pair.
//! Tests full round trips across table sizes, Huffman settings and charsets.

use bytes::BytesMut;
use proptest::prelude::*;
use quicd_hpack::{Charset, Decoder, Encoder, HeaderField, HpackConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Route codec logs to the test harness; `RUST_LOG=quicd_hpack=trace` shows them.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_target(true);

    // Another test may have installed it already
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn pair(config: &HpackConfig) -> (Encoder, Decoder) {
    (Encoder::new(config), Decoder::new(config))
}

fn round_trip(
    encoder: &mut Encoder,
    decoder: &mut Decoder,
    headers: &[HeaderField],
    no_indexing: bool,
    huffman: bool,
) -> Vec<HeaderField> {
    let mut dst = BytesMut::new();
    encoder
        .encode_headers(&mut dst, headers, no_indexing, huffman)
        .unwrap();
    decoder.decode_headers(&dst).unwrap()
}

fn request(path: &str) -> Vec<HeaderField> {
    vec![
        HeaderField::new(":method", "GET"),
        HeaderField::new(":scheme", "https"),
        HeaderField::new(":authority", "api.example.com"),
        HeaderField::new(":path", path),
        HeaderField::new("user-agent", "quicd-hpack/0.1"),
        HeaderField::new("accept", "application/json"),
        HeaderField::new("x-request-id", path.len().to_string()),
    ]
}

#[test]
fn test_encode_decode_static_headers() {
    let (mut encoder, mut decoder) = pair(&HpackConfig::default());
    let headers = vec![
        HeaderField::new(":method", "GET"),
        HeaderField::new(":scheme", "https"),
        HeaderField::new(":path", "/"),
    ];

    let block = encoder.encode(&headers).unwrap();
    assert_eq!(&block[..], &[0x82, 0x87, 0x84]);
    assert_eq!(decoder.decode_headers(&block).unwrap(), headers);
}

#[test]
fn test_tables_stay_in_sync() {
    init_logging();
    for huffman in [false, true] {
        let (mut encoder, mut decoder) = pair(&HpackConfig::default());
        for i in 0..50 {
            let headers = request(&format!("/items/{}", i % 7));
            let decoded = round_trip(&mut encoder, &mut decoder, &headers, false, huffman);
            assert_eq!(decoded, headers);
            assert_eq!(encoder.table().len(), decoder.table().len());
            assert_eq!(
                encoder.table().current_size(),
                decoder.table().current_size()
            );
        }
    }
}

#[test]
fn test_repeated_block_shrinks() {
    let (mut encoder, mut decoder) = pair(&HpackConfig::default());
    let headers = request("/search?q=hpack");

    let first = encoder.encode(&headers).unwrap();
    decoder.decode_headers(&first).unwrap();
    let second = encoder.encode(&headers).unwrap();

    // Every field is now a one-byte index
    assert_eq!(second.len(), headers.len());
    assert_eq!(decoder.decode_headers(&second).unwrap(), headers);
}

#[test]
fn test_small_table_evicts_in_lockstep() {
    let config = HpackConfig {
        max_table_size: 128,
        ..Default::default()
    };
    let (mut encoder, mut decoder) = pair(&config);
    for i in 0..20 {
        let headers = vec![
            HeaderField::new(format!("x-custom-{}", i % 5), "some-longer-value"),
            HeaderField::new("x-trace", i.to_string()),
        ];
        let decoded = round_trip(&mut encoder, &mut decoder, &headers, false, i % 2 == 0);
        assert_eq!(decoded, headers);
        assert!(decoder.table().current_size() <= 128);
        assert_eq!(encoder.table().len(), decoder.table().len());
    }
}

#[test]
fn test_zero_size_table() {
    let config = HpackConfig {
        max_table_size: 0,
        ..Default::default()
    };
    let (mut encoder, mut decoder) = pair(&config);
    let headers = request("/");
    let decoded = round_trip(&mut encoder, &mut decoder, &headers, false, true);
    assert_eq!(decoded, headers);
    assert!(encoder.table().is_empty());
    assert!(decoder.table().is_empty());
}

#[test]
fn test_no_indexing_round_trip() {
    let (mut encoder, mut decoder) = pair(&HpackConfig::default());
    let headers = request("/private");
    let decoded = round_trip(&mut encoder, &mut decoder, &headers, true, true);
    assert_eq!(decoded, headers);
    assert!(encoder.table().is_empty());
    assert!(decoder.table().is_empty());
}

#[test]
fn test_sensitive_headers_preserved() {
    let (mut encoder, mut decoder) = pair(&HpackConfig::default());
    let headers = vec![
        HeaderField::new(":method", "POST"),
        HeaderField::sensitive("authorization", "Bearer abc.def.ghi"),
        HeaderField::sensitive("cookie", "session=42"),
        HeaderField::new("content-type", "text/plain"),
    ];

    for _ in 0..2 {
        let decoded = round_trip(&mut encoder, &mut decoder, &headers, false, true);
        assert_eq!(decoded, headers);
        assert!(decoded[1].sensitive);
        assert!(decoded[2].sensitive);
    }
    // Only content-type made it into the tables
    assert_eq!(encoder.table().len(), 1);
    assert_eq!(decoder.table().len(), 1);
}

#[test]
fn test_latin1_and_utf8_charsets() {
    let latin1 = vec![HeaderField::new("x-name", "Café Zoë")];
    let (mut encoder, mut decoder) = pair(&HpackConfig::default());
    assert_eq!(
        round_trip(&mut encoder, &mut decoder, &latin1, false, true),
        latin1
    );
    // Table size counts Latin-1 octets: 6 + 8 + 32
    assert_eq!(decoder.table().current_size(), 46);
    assert_eq!(encoder.table().current_size(), 46);

    let config = HpackConfig {
        charset: Charset::Utf8,
        ..Default::default()
    };
    let utf8 = vec![HeaderField::new("x-greeting", "こんにちは €")];
    let (mut encoder, mut decoder) = pair(&config);
    assert_eq!(round_trip(&mut encoder, &mut decoder, &utf8, false, true), utf8);
    assert_eq!(
        decoder.table().current_size(),
        "x-greeting".len() + "こんにちは €".len() + 32
    );
}

#[test]
fn test_size_update_round_trip() {
    init_logging();
    let (mut encoder, mut decoder) = pair(&HpackConfig::default());
    let headers = request("/a");
    round_trip(&mut encoder, &mut decoder, &headers, false, true);
    assert!(!decoder.table().is_empty());

    // Peer shrinks then regrows the table between blocks
    encoder.set_max_table_size(0);
    encoder.set_max_table_size(2048);
    let decoded = round_trip(&mut encoder, &mut decoder, &headers, false, true);
    assert_eq!(decoded, headers);
    assert_eq!(decoder.table().max_size(), 2048);
    assert_eq!(encoder.table().max_size(), 2048);
    assert_eq!(
        encoder.table().current_size(),
        decoder.table().current_size()
    );
}

#[test]
fn test_explicit_size_update() {
    init_logging();
    let (mut encoder, mut decoder) = pair(&HpackConfig::default());
    round_trip(&mut encoder, &mut decoder, &request("/b"), false, false);

    let mut dst = BytesMut::new();
    encoder.encode_table_size_update(&mut dst, 100);
    assert!(decoder.decode_headers(&dst).unwrap().is_empty());
    assert_eq!(decoder.table().max_size(), 100);
    assert_eq!(
        encoder.table().current_size(),
        decoder.table().current_size()
    );
}

#[test]
fn test_header_list_limit_applies_per_block() {
    init_logging();
    let config = HpackConfig {
        max_header_list_size: Some(300),
        ..Default::default()
    };
    let (mut encoder, mut decoder) = pair(&config);

    let small = vec![HeaderField::new(":method", "GET")];
    let block = encoder.encode(&small).unwrap();
    for _ in 0..10 {
        assert_eq!(decoder.decode_headers(&block).unwrap(), small);
    }

    let large = vec![HeaderField::new("x-big", "v".repeat(400))];
    let block = encoder.encode(&large).unwrap();
    assert!(decoder.decode_headers(&block).is_err());
}

fn header_field() -> impl Strategy<Value = HeaderField> {
    (
        prop_oneof![
            Just(":method".to_string()),
            Just(":path".to_string()),
            Just("content-type".to_string()),
            "[a-z][a-z0-9-]{0,15}",
        ],
        "[ -~]{0,40}",
        any::<bool>(),
    )
        .prop_map(|(name, value, sensitive)| HeaderField {
            name,
            value,
            sensitive,
        })
}

proptest! {
    #[test]
    fn prop_header_lists_round_trip(
        blocks in proptest::collection::vec(proptest::collection::vec(header_field(), 0..12), 1..6),
        table_size in prop_oneof![Just(0usize), Just(64), Just(256), Just(4096)],
        huffman in any::<bool>(),
        no_indexing in any::<bool>()
    ) {
        let config = HpackConfig {
            max_table_size: table_size,
            ..Default::default()
        };
        let (mut encoder, mut decoder) = pair(&config);

        for headers in &blocks {
            let mut dst = BytesMut::new();
            encoder.encode_headers(&mut dst, headers, no_indexing, huffman).unwrap();
            let decoded = decoder.decode_headers(&dst).unwrap();
            prop_assert_eq!(&decoded, headers);
            prop_assert_eq!(encoder.table().current_size(), decoder.table().current_size());
            prop_assert!(decoder.table().current_size() <= table_size);
        }
    }
}
