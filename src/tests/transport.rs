use crate::{
    application::network::transport::interface::{TransportError, TransportInterface},
    domain::Envelope,
    infra::network::tcp::TcpAdapter,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    time,
};

fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn chat(text: &str, time: u64) -> Envelope {
    Envelope::Chat {
        from: "a".to_string(),
        text: text.to_string(),
        time,
    }
}

#[tokio::test]
async fn chat_round_trip_returns_ok_ack() {
    let server = TcpAdapter::new(0).await.unwrap();
    let addr = loopback(server.local_addr().unwrap().port());
    let client = TcpAdapter::new(0).await.unwrap();

    let envelope = chat("hi", 42);
    let (ack, inbound) = tokio::join!(client.send(addr, &envelope), server.next());

    assert_eq!(ack.unwrap(), serde_json::json!({"status": "ok"}));

    let inbound = inbound.unwrap().unwrap();
    assert_eq!(inbound.envelope, envelope);
    assert!(inbound.src_ip.is_loopback());
}

#[tokio::test]
async fn splits_buffered_lines_and_acks_each() {
    let server = Arc::new(TcpAdapter::new(0).await.unwrap());
    let port = server.local_addr().unwrap().port();

    let srv = server.clone();
    let collector = tokio::spawn(async move {
        let mut got = Vec::new();
        for _ in 0..2 {
            got.push(srv.next().await.unwrap().unwrap());
        }
        got
    });

    // Two envelopes written in two fragments, the split landing mid-line.
    let one = serde_json::to_string(&chat("first", 1)).unwrap();
    let two = serde_json::to_string(&chat("second", 2)).unwrap();
    let payload = format!("{one}\n{two}\n");
    let (head, tail) = payload.split_at(one.len() / 2);

    let mut stream = TcpStream::connect(loopback(port)).await.unwrap();
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();
    time::sleep(Duration::from_millis(50)).await;
    stream.write_all(tail.as_bytes()).await.unwrap();

    let got = collector.await.unwrap();
    assert!(matches!(&got[0].envelope, Envelope::Chat { text, .. } if text == "first"));
    assert!(matches!(&got[1].envelope, Envelope::Chat { text, .. } if text == "second"));

    // Both acks come back on the same connection.
    let mut reader = BufReader::new(stream);
    for _ in 0..2 {
        let mut ack = String::new();
        reader.read_line(&mut ack).await.unwrap();
        assert_eq!(ack.trim(), r#"{"status":"ok"}"#);
    }
}

#[tokio::test]
async fn undecodable_line_gets_no_ack() {
    let server = Arc::new(TcpAdapter::new(0).await.unwrap());
    let port = server.local_addr().unwrap().port();

    let srv = server.clone();
    tokio::spawn(async move {
        let _ = srv.next().await;
    });

    for bad_line in [&b"this is not json\n"[..], &b"{\"type\":\"bogus\"}\n"[..]] {
        let mut stream = TcpStream::connect(loopback(port)).await.unwrap();
        stream.write_all(bad_line).await.unwrap();

        let mut buf = [0u8; 16];
        let read = time::timeout(Duration::from_millis(300), stream.read(&mut buf)).await;
        assert!(read.is_err(), "no ack expected for {bad_line:?}");
    }
}

#[tokio::test]
async fn send_to_dead_port_rejects_with_socket_error() {
    let client = TcpAdapter::new(0).await.unwrap();

    // Bind then drop to find a loopback port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client.send(addr, &chat("hi", 1)).await.unwrap_err();
    assert!(matches!(err, TransportError::Io(_)), "got: {err}");
}

#[tokio::test]
async fn silent_peer_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        // Accept and hold the connection, never answering.
        let held = listener.accept().await;
        time::sleep(Duration::from_secs(30)).await;
        drop(held);
    });

    let client = TcpAdapter::new(0).await.unwrap();
    let start = std::time::Instant::now();
    let err = client.send(addr, &chat("hi", 1)).await.unwrap_err();

    assert!(matches!(err, TransportError::Timeout));
    assert_eq!(err.to_string(), "TCP connection timeout");
    assert!(start.elapsed() >= Duration::from_millis(3900));
}

#[tokio::test]
async fn peer_closing_before_ack_rejects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 256];
        let _ = stream.read(&mut buf).await; // consume the request, then hang up
    });

    let client = TcpAdapter::new(0).await.unwrap();
    let err = client.send(addr, &chat("hi", 1)).await.unwrap_err();

    assert!(matches!(err, TransportError::ConnectionClosed));
    assert_eq!(err.to_string(), "Unable to connect to peer");
}

#[test]
fn envelope_wire_shape_matches_protocol() {
    let value = serde_json::to_value(chat("hi", 7)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"type": "chat", "from": "a", "text": "hi", "time": 7})
    );
}
