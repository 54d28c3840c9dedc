//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use minter_gate::bus::InMemoryEventBus;
use minter_gate::config::ListenerConfig;
use minter_gate::node::{HttpNodeClient, SharedNodeClient};
use minter_gate::{Gate, HttpServer, Shutdown};

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable mock node.
///
/// `f` receives the request target (path and query) and returns the status
/// code and body to answer with.
pub async fn start_mock_node<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
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
                        let mut request = Vec::new();
                        let mut buf = [0u8; 4096];
                        loop {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => request.extend_from_slice(&buf[..n]),
                            }
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }

                        let request = String::from_utf8_lossy(&request).to_string();
                        let target = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, body) = f(target).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
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

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[allow(dead_code)]
pub fn node_client(addr: SocketAddr) -> SharedNodeClient {
    let config = minter_gate::config::NodeConfig {
        api_url: format!("http://{}", addr),
        timeout_secs: 2,
    };
    Arc::new(HttpNodeClient::new(&config).unwrap())
}

/// A running gateway API in front of the node at `node_addr`.
#[allow(dead_code)]
pub struct TestGateway {
    pub addr: SocketAddr,
    pub bus: Arc<InMemoryEventBus>,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestGateway {
    pub async fn start(node_addr: SocketAddr, push_wait_timeout_secs: u64) -> Self {
        let bus = Arc::new(InMemoryEventBus::with_capacity(64));
        bus.start();

        let config = ListenerConfig {
            bind_address: "127.0.0.1:0".into(),
            request_timeout_secs: 10,
            push_wait_timeout_secs,
        };
        let server = HttpServer::new(
            config,
            minter_gate::bus::NEW_TX_TOPIC.to_string(),
            Gate::new(node_client(node_addr)),
            bus.clone(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self { addr, bus, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
