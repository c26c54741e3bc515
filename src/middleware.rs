use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{request::Parts, Extensions, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use tracing::info;

use crate::handlers::SharedState;
use crate::rate_limiter::UNKNOWN_CLIENT;

/// Logging middleware for request/response tracking
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = client_ip(request.headers(), request.extensions());

    info!(
        target: "random_words::middleware",
        method = %method,
        uri = %uri,
        client_ip = %client_ip,
        "Incoming request"
    );

    let response = next.run(request).await;

    let status = response.status();
    info!(
        target: "random_words::middleware",
        method = %method,
        uri = %uri,
        status = %status,
        "Request completed"
    );

    response
}

/// Make sure the word lists have been fetched before a data route runs
pub async fn ensure_loaded(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    state.loader.ensure_loaded(&state.store).await;
    next.run(request).await
}

/// Rate limiting identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientId(client_ip(&parts.headers, &parts.extensions)))
    }
}

pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    // Proxy headers first
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                let first_ip = first_ip.trim();
                if !first_ip.is_empty() {
                    return first_ip.to_string();
                }
            }
        }
    }

    for name in ["x-real-ip", "cf-connecting-ip"] {
        if let Some(ip_str) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let ip_str = ip_str.trim();
            if !ip_str.is_empty() {
                return ip_str.to_string();
            }
        }
    }

    match extensions.get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}
