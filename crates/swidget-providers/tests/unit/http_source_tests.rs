//! Tests for the HTTP bundle source
//!
//! Serves bundles from a throwaway TCP listener speaking just enough HTTP/1.1.

use std::time::Duration;

use reqwest::Client;
use swidget_domain::error::LoadFailureKind;
use swidget_domain::ports::BundleSource;
use swidget_providers::HttpBundleSource;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Answer one request with `status` and `body`, returning the base URL
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });
    format!("http://{addr}")
}

/// Answer one request with a chunked body of `chunks` x `chunk_size` bytes
///
/// Resolves to the number of body bytes written before the peer went away.
async fn serve_chunked(chunks: usize, chunk_size: usize) -> (String, oneshot::Receiver<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (sent_tx, sent_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).await;
        let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ntransfer-encoding: chunked\r\nconnection: close\r\n\r\n";
        let mut sent = 0;
        if stream.write_all(head.as_bytes()).await.is_ok() {
            let mut frame = format!("{chunk_size:x}\r\n").into_bytes();
            frame.extend(std::iter::repeat_n(b' ', chunk_size));
            frame.extend_from_slice(b"\r\n");
            for _ in 0..chunks {
                if stream.write_all(&frame).await.is_err() {
                    break;
                }
                sent += chunk_size;
            }
            let _ = stream.write_all(b"0\r\n\r\n").await;
        }
        let _ = stream.shutdown().await;
        let _ = sent_tx.send(sent);
    });
    (format!("http://{addr}"), sent_rx)
}

fn source() -> HttpBundleSource {
    let client = Client::builder().no_proxy().build().unwrap();
    HttpBundleSource::new(client, Duration::from_secs(5))
}

#[tokio::test]
async fn test_fetches_body_and_content_type() {
    let base = serve_once("200 OK", r#"{"format":1}"#).await;

    let bundle = source().fetch(&format!("{base}/swidget.json")).await.unwrap();

    assert_eq!(bundle.bytes, br#"{"format":1}"#.to_vec());
    assert_eq!(bundle.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_404_is_not_found() {
    let base = serve_once("404 Not Found", "").await;

    let err = source()
        .fetch(&format!("{base}/missing.json"))
        .await
        .unwrap_err();

    assert_eq!(err.load_failure().unwrap().kind, LoadFailureKind::NotFound);
}

#[tokio::test]
async fn test_server_error_is_network_failure() {
    let base = serve_once("503 Service Unavailable", "").await;

    let err = source().fetch(&format!("{base}/app.json")).await.unwrap_err();

    assert_eq!(err.load_failure().unwrap().kind, LoadFailureKind::Network);
}

#[tokio::test]
async fn test_declared_length_over_limit_is_rejected() {
    let base = serve_once("200 OK", "0123456789abcdef0123456789abcdef").await;

    let err = source()
        .with_max_bytes(8)
        .fetch(&format!("{base}/app.json"))
        .await
        .unwrap_err();

    assert_eq!(
        err.load_failure().unwrap().kind,
        LoadFailureKind::ContractViolation
    );
}

#[tokio::test]
async fn test_refused_connection_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source()
        .fetch(&format!("http://{addr}/app.json"))
        .await
        .unwrap_err();

    assert_eq!(err.load_failure().unwrap().kind, LoadFailureKind::Network);
}

#[tokio::test]
async fn test_chunked_body_within_limit_is_read() {
    let (base, sent) = serve_chunked(4, 16).await;

    let bundle = source()
        .with_max_bytes(64)
        .fetch(&format!("{base}/app.json"))
        .await
        .unwrap();

    assert_eq!(bundle.bytes.len(), 64);
    assert_eq!(sent.await.unwrap(), 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_chunked_body_over_limit_stops_reading() {
    let chunk_size = 64 * 1024;
    let chunks = 512;
    let (base, sent) = serve_chunked(chunks, chunk_size).await;

    let err = source()
        .with_max_bytes(1024)
        .fetch(&format!("{base}/app.json"))
        .await
        .unwrap_err();

    assert_eq!(
        err.load_failure().unwrap().kind,
        LoadFailureKind::ContractViolation
    );
    let sent = tokio::time::timeout(Duration::from_secs(10), sent)
        .await
        .unwrap()
        .unwrap();
    assert!(
        sent < chunks * chunk_size,
        "server wrote the whole {sent} byte body"
    );
}
