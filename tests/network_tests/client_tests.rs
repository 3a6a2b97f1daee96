//! Client Tests
//!
//! End-to-end request/response exchanges against an in-process server.

mod support;

use std::net::TcpListener;

use bytes::Bytes;
use respwire::{args, Arg, Client, ClientConfig, FramingError, RespError, Value};
use support::{serve_raw_once, TestServer};

// =============================================================================
// Helper Functions
// =============================================================================

fn config_for(addr: std::net::SocketAddr) -> ClientConfig {
    ClientConfig::builder()
        .addr(addr.to_string())
        .connect_timeout_ms(2000)
        .read_timeout_ms(5000)
        .write_timeout_ms(5000)
        .build()
}

fn connect(server: &TestServer) -> Client {
    Client::connect(&config_for(server.addr)).unwrap()
}

// =============================================================================
// Exchange Tests
// =============================================================================

#[test]
fn test_set_then_get() {
    let server = TestServer::start(1);
    let mut client = connect(&server);

    let reply = client.send(&args!["SET", "some-key", "Maurício"]).unwrap();
    assert_eq!(reply.as_string().unwrap(), ("OK", false));

    let reply = client.send(&args!["GET", "some-key"]).unwrap();
    assert_eq!(reply.as_string().unwrap(), ("Maurício", false));

    client.close().unwrap();
    server.join();
}

#[test]
fn test_get_missing_key_is_null() {
    let server = TestServer::start(1);
    let mut client = connect(&server);

    let reply = client.send(&args!["GET", "some-other-key"]).unwrap();
    assert_eq!(reply, Value::Null);
    assert_eq!(reply.as_string().unwrap(), ("", true));

    client.close().unwrap();
    server.join();
}

#[test]
fn test_utf8_keys() {
    let server = TestServer::start(1);
    let mut client = connect(&server);

    client.send(&args!["SET", "対馬", "Tsushima"]).unwrap();
    let reply = client.send(&args!["GET", "対馬"]).unwrap();
    assert_eq!(reply.as_string().unwrap(), ("Tsushima", false));

    client.close().unwrap();
    server.join();
}

#[test]
fn test_binary_value_with_terminator() {
    let server = TestServer::start(1);
    let mut client = connect(&server);
    let payload: &[u8] = b"\x00\r\n\xff\r\n";

    client.send(&[Arg::from("SET"), Arg::from("bin"), Arg::from(payload)]).unwrap();
    let reply = client.send(&args!["GET", "bin"]).unwrap();
    assert_eq!(reply, Value::BulkString(Bytes::copy_from_slice(payload)));

    client.close().unwrap();
    server.join();
}

#[test]
fn test_integer_reply() {
    let server = TestServer::start(1);
    let mut client = connect(&server);

    assert_eq!(client.send(&args!["INCR", "n"]).unwrap().as_integer().unwrap(), 1);
    assert_eq!(client.send(&args!["INCR", "n"]).unwrap().as_integer().unwrap(), 2);
    assert_eq!(client.send(&args!["DEL", "n", "missing"]).unwrap().as_integer().unwrap(), 1);

    client.close().unwrap();
    server.join();
}

#[test]
fn test_array_reply() {
    let server = TestServer::start(1);
    let mut client = connect(&server);

    assert_eq!(
        client.send(&args!["KEYS"]).unwrap().as_array().unwrap(),
        Some(&[][..])
    );

    client.send(&args!["SET", "b", "2"]).unwrap();
    client.send(&args!["SET", "a", 1]).unwrap();
    let reply = client.send(&args!["KEYS"]).unwrap();
    let keys: Vec<&str> = reply
        .as_array()
        .unwrap()
        .unwrap()
        .iter()
        .map(|k| k.as_string().unwrap().0)
        .collect();
    assert_eq!(keys, vec!["a", "b"]);

    client.close().unwrap();
    server.join();
}

#[test]
fn test_error_reply_keeps_connection_usable() {
    let server = TestServer::start(1);
    let mut client = connect(&server);

    let reply = client.send(&args!["NOPE"]).unwrap();
    assert_eq!(reply.as_error(), Some("ERR unknown command 'nope'"));
    let err = reply.as_integer().unwrap_err();
    assert!(!err.is_fatal());
    assert_eq!(err.to_string(), "ERR unknown command 'nope'");
    assert!(!client.is_broken());

    let reply = client.send(&args!["PING"]).unwrap();
    assert_eq!(reply, Value::SimpleString("PONG".to_string()));

    client.close().unwrap();
    server.join();
}

#[test]
fn test_echo_nested_request() {
    let server = TestServer::start(1);
    let mut client = connect(&server);

    let reply = client
        .send(&args!["ECHO", vec![Arg::from(1i16), Arg::from("x"), Arg::Null]])
        .unwrap();
    assert_eq!(
        reply,
        Value::Array(vec![
            Value::Integer(1),
            Value::BulkString(Bytes::from_static(b"x")),
            Value::Null,
        ])
    );

    client.close().unwrap();
    server.join();
}

#[test]
fn test_sequential_connections() {
    let server = TestServer::start(2);

    let mut first = connect(&server);
    first.send(&args!["SET", "shared", "yes"]).unwrap();
    first.close().unwrap();

    let mut second = connect(&server);
    let reply = second.send(&args!["GET", "shared"]).unwrap();
    assert_eq!(reply.as_string().unwrap(), ("yes", false));
    second.close().unwrap();

    server.join();
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_truncated_response_is_framing_error() {
    let (addr, handle) = serve_raw_once(b"$10\r\nshort");
    let mut client = Client::connect(&config_for(addr)).unwrap();

    let err = client.send(&args!["GET", "k"]).unwrap_err();
    assert!(err.is_fatal());
    match err {
        RespError::Framing(FramingError::IncompleteBulk {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 17);
            assert_eq!(actual, 10);
        }
        other => panic!("Expected IncompleteBulk, got {:?}", other),
    }

    handle.join().unwrap();
}

#[test]
fn test_client_refuses_requests_after_fatal_error() {
    let (addr, handle) = serve_raw_once(b"$10\r\nshort");
    let mut client = Client::connect(&config_for(addr)).unwrap();

    let err = client.send(&args!["GET", "k"]).unwrap_err();
    assert!(err.is_fatal());
    assert!(client.is_broken());

    let err = client.send(&args!["PING"]).unwrap_err();
    assert!(matches!(err, RespError::Broken(_)));
    assert!(err.is_fatal());

    handle.join().unwrap();
}

#[test]
fn test_no_response_is_empty_stream() {
    let (addr, handle) = serve_raw_once(b"");
    let mut client = Client::connect(&config_for(addr)).unwrap();

    let err = client.send(&args!["PING"]).unwrap_err();
    assert!(matches!(err, RespError::EmptyStream));

    handle.join().unwrap();
}

#[test]
fn test_connect_refused() {
    // Bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let err = Client::connect(&config_for(addr)).err().unwrap();

    assert!(matches!(err, RespError::Connect { .. }));
    assert!(err.to_string().starts_with(&format!("failed to connect to {}", addr)));
}

#[test]
fn test_connect_rejects_invalid_config() {
    let config = ClientConfig::builder().addr("").build();

    assert!(matches!(Client::connect(&config), Err(RespError::Config(_))));

    let config = ClientConfig::builder().read_buffer_size(0).build();
    assert!(matches!(config.validate(), Err(RespError::Config(_))));
}
