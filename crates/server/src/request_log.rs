//! Per-request logging middleware.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Remote address of the caller, or `"unknown"` when the server was not
/// started with connect info (e.g. in-process tests).
pub fn peer_addr<B>(req: &axum::http::Request<B>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let peer = peer_addr(&req);
    let start = Instant::now();

    let resp = next.run(req).await;

    let status = resp.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    if resp.status().is_client_error() || resp.status().is_server_error() {
        warn!(%method, %path, %peer, status, elapsed_ms, "rpc response error");
    } else {
        info!(%method, %path, %peer, status, elapsed_ms, "rpc response");
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn peer_falls_back_to_unknown() {
        let req = axum::http::Request::new(Body::empty());
        assert_eq!(peer_addr(&req), "unknown");
    }

    #[test]
    fn peer_uses_connect_info() {
        let mut req = axum::http::Request::new(Body::empty());
        let addr: SocketAddr = "10.0.0.7:41000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(peer_addr(&req), "10.0.0.7:41000");
    }
}
