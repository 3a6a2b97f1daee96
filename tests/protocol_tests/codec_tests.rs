//! Codec Tests
//!
//! Tests for request and value encoding.

use bytes::{Bytes, BytesMut};
use respwire::args;
use respwire::protocol::{
    decode_value, encode_request, encode_value, write_request, write_value, Arg, Value,
};
use respwire::RespError;

// =============================================================================
// Helper Functions
// =============================================================================

fn encode(args: &[Arg]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_request(Some(args), &mut buf);
    buf.to_vec()
}

fn bulk(data: &'static [u8]) -> Value {
    Value::BulkString(Bytes::from_static(data))
}

/// A sink that fails after accepting `limit` bytes
struct FailingWriter {
    written: Vec<u8>,
    limit: usize,
}

impl std::io::Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let room = self.limit - self.written.len();
        if room == 0 {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_text_as_bulk_string() {
    assert_eq!(encode(&args!["GET", "key"]), b"*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n");
}

#[test]
fn test_encode_integers_of_every_width() {
    let request = vec![
        Arg::from(-8i8),
        Arg::from(16i16),
        Arg::from(-32i32),
        Arg::from(i64::MIN),
        Arg::from(255u8),
    ];

    assert_eq!(
        encode(&request),
        b"*5\r\n:-8\r\n:16\r\n:-32\r\n:-9223372036854775808\r\n:255\r\n"
    );
}

#[test]
fn test_encode_null_argument() {
    assert_eq!(encode(&[Arg::Null]), b"*1\r\n$-1\r\n");
    assert_eq!(encode(&[Arg::from(None::<&str>)]), b"*1\r\n$-1\r\n");
}

#[test]
fn test_encode_empty_text_is_not_null() {
    assert_eq!(encode(&args![""]), b"*1\r\n$0\r\n\r\n");
}

#[test]
fn test_encode_bytes_with_terminator() {
    assert_eq!(
        encode(&[Arg::from(&b"a\r\nb"[..])]),
        b"*1\r\n$4\r\na\r\nb\r\n"
    );
}

#[test]
fn test_encode_nested_arrays() {
    let request = args![
        vec![Arg::from("nope"), Arg::from("yup")],
        10,
        Arg::Array(None),
        Vec::<Arg>::new(),
    ];

    assert_eq!(
        encode(&request),
        b"*4\r\n*2\r\n$4\r\nnope\r\n$3\r\nyup\r\n:10\r\n*-1\r\n*0\r\n"
    );
}

#[test]
fn test_encode_null_request() {
    let mut buf = BytesMut::new();
    encode_request(None, &mut buf);

    assert_eq!(&buf[..], b"*-1\r\n");
}

#[test]
fn test_encode_empty_request() {
    assert_eq!(encode(&[]), b"*0\r\n");
}

#[test]
fn test_write_request_flushes_everything() {
    let mut sink = Vec::new();
    write_request(&mut sink, Some(&args!["PING"][..])).unwrap();

    assert_eq!(sink, b"*1\r\n$4\r\nPING\r\n");
}

#[test]
fn test_write_request_partial_failure() {
    let mut sink = FailingWriter {
        written: Vec::new(),
        limit: 6,
    };
    let err = write_request(&mut sink, Some(&args!["SET", "k", "v"][..])).unwrap_err();

    assert!(matches!(err, RespError::Io(_)));
    assert_eq!(sink.written, b"*3\r\n$3");
}

// =============================================================================
// Argument Conversion Tests
// =============================================================================

#[test]
fn test_unsigned_overflow_is_unsupported() {
    assert_eq!(Arg::try_from(42u64).unwrap(), Arg::Int(42));

    let err = Arg::try_from(u64::MAX).unwrap_err();
    assert!(matches!(err, RespError::Unsupported(_)));
    assert!(err.to_string().contains("18446744073709551615"));
}

#[test]
fn test_error_value_is_unsupported_argument() {
    let err = Arg::try_from(Value::Error("ERR boom".to_string())).unwrap_err();

    assert!(matches!(err, RespError::Unsupported(_)));
    assert!(err.to_string().contains("ERR boom"));
}

#[test]
fn test_nested_error_value_is_unsupported_argument() {
    let value = Value::Array(vec![Value::Integer(1), Value::Error("nested".to_string())]);

    assert!(matches!(Arg::try_from(value), Err(RespError::Unsupported(_))));
}

#[test]
fn test_value_converts_to_argument() {
    let value = Value::Array(vec![
        Value::SimpleString("a".to_string()),
        bulk(b"b"),
        Value::Integer(3),
        Value::Null,
    ]);

    assert_eq!(
        Arg::try_from(value).unwrap(),
        Arg::Array(Some(vec![
            Arg::Text("a".to_string()),
            Arg::Bytes(Bytes::from_static(b"b")),
            Arg::Int(3),
            Arg::Null,
        ]))
    );
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_mixed_request_round_trip() {
    let request = args![
        "SET",
        -5i8,
        &b"\x00bin\r\n"[..],
        vec![Arg::from(1i32), Arg::from("x")],
        None::<String>,
        "",
    ];

    let decoded = decode_value(&encode(&request)).unwrap();

    assert_eq!(
        decoded,
        Value::Array(vec![
            bulk(b"SET"),
            Value::Integer(-5),
            bulk(b"\x00bin\r\n"),
            Value::Array(vec![Value::Integer(1), bulk(b"x")]),
            Value::Null,
            bulk(b""),
        ])
    );
}

#[test]
fn test_null_request_round_trip() {
    let mut buf = BytesMut::new();
    encode_request(None, &mut buf);

    assert_eq!(decode_value(&buf).unwrap(), Value::Null);
}

#[test]
fn test_value_round_trip() {
    let values = vec![
        Value::SimpleString("OK".to_string()),
        Value::Error("ERR nope".to_string()),
        Value::Integer(-1),
        bulk(b"line\r\nbreak"),
        bulk(b""),
        Value::Null,
        Value::Array(vec![]),
        Value::Array(vec![
            Value::Array(vec![Value::Integer(1), Value::Null]),
            Value::SimpleString("Foo".to_string()),
        ]),
    ];

    for value in values {
        let mut buf = BytesMut::new();
        encode_value(&value, &mut buf);
        assert_eq!(decode_value(&buf).unwrap(), value);
    }
}

#[test]
fn test_write_value_wire_format() {
    let mut sink = Vec::new();
    let value = Value::Array(vec![
        Value::SimpleString("Foo".to_string()),
        Value::Error("Bar".to_string()),
        Value::Null,
    ]);
    write_value(&mut sink, &value).unwrap();

    assert_eq!(sink, b"*3\r\n+Foo\r\n-Bar\r\n$-1\r\n");
}
