//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response, StatusCode},
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use dev_proxy::{HttpServer, ProxyConfig, Shutdown};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

pub type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

pub fn recorded(recorder: &Recorder) -> Vec<RecordedRequest> {
    recorder.lock().unwrap().clone()
}

/// Start a backend that records every request and answers with a fixed response.
///
/// `content_type: None` sends no `Content-Type` header at all.
pub async fn start_recording_backend(
    status: u16,
    content_type: Option<&'static str>,
    body: &'static str,
) -> (SocketAddr, Recorder) {
    let recorder: Recorder = Arc::default();
    let rec = recorder.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let rec = rec.clone();
        async move {
            let (parts, incoming) = request.into_parts();
            let bytes = axum::body::to_bytes(incoming, usize::MAX).await.unwrap();
            rec.lock().unwrap().push(RecordedRequest {
                method: parts.method.to_string(),
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body: bytes.to_vec(),
            });

            let mut builder = Response::builder().status(status);
            if let Some(ct) = content_type {
                builder = builder.header("content-type", ct);
            }
            builder.body(Body::from(body)).unwrap()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorder)
}

/// Start a raw TCP backend that returns a fixed 200 with no `Content-Type`.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    start_programmable_backend(move || async move { (200, response.to_string()) }).await
}

/// Start a programmable raw backend with async support.
///
/// Responses carry only `Content-Length` and `Connection: close`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 8192];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let response_str = format!(
                            "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Start a backend that answers every request with `302 Found`.
///
/// With `absolute` the `Location` names the backend's own origin, otherwise it
/// is the bare `path`.
pub async fn start_redirect_backend(path: &'static str, absolute: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let location = if absolute {
        format!("http://{}{}", addr, path)
    } else {
        path.to_string()
    };

    let app = Router::new().fallback(move || {
        let location = location.clone();
        async move { (StatusCode::FOUND, [(header::LOCATION, location)], "moved") }
    });
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Signals from a backend that never answers.
pub struct HangingBackend {
    pub addr: SocketAddr,
    /// Fires once the first request has been read.
    pub accepted: oneshot::Receiver<()>,
    /// Fires when the peer closes that connection.
    pub closed: oneshot::Receiver<()>,
}

/// Start a backend that reads one request, never responds, and reports when
/// the proxy side hangs up.
pub async fn start_hanging_backend() -> HangingBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (accepted_tx, accepted) = oneshot::channel();
    let (closed_tx, closed) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 8192];
        let _ = socket.read(&mut buf).await;
        let _ = accepted_tx.send(());

        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let _ = closed_tx.send(());
    });

    HangingBackend {
        addr,
        accepted,
        closed,
    }
}

/// Write `raw` to `addr` as-is and return everything read until the peer
/// closes, giving up after `wait`.
pub async fn send_raw(addr: SocketAddr, raw: &str, wait: Duration) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    let _ = tokio::time::timeout(wait, stream.read_to_end(&mut response)).await;
    String::from_utf8_lossy(&response).into_owned()
}

/// An address nothing is listening on.
pub async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A fresh static root with `index.html` and `app.js`.
pub fn static_root() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dev-proxy-it-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>dev ui</html>").unwrap();
    std::fs::write(dir.join("app.js"), "console.log('ui')").unwrap();
    dir
}

/// Default config pointed at the given backends and a fresh static root.
pub fn proxy_config(primary: SocketAddr, decision: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.backends.primary = format!("http://{}", primary);
    config.backends.decision = format!("http://{}", decision);
    config.static_files.root = static_root();
    config
}

/// Start the proxy on an ephemeral port. Keep the `Shutdown` alive for the test.
pub async fn spawn_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).expect("test config should validate");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn assert_cors(headers: &reqwest::header::HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
    assert_eq!(headers["access-control-max-age"], "86400");
}
