//! Rate limiting middleware

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppError, AppState};

const ANONYMOUS_CLIENT: &str = "anonymous";

/// Middleware: throttle per client IP before any handler work starts
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(limiter) = &state.rate_limiter {
        let client = client_key(&req);
        if !limiter.allow(&client) {
            tracing::warn!("Rate limit exceeded for {}", client);
            return Err(AppError::RateLimited);
        }
    }

    Ok(next.run(req).await)
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
}
