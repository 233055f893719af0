//! Liveness probe.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// Crate version of the running server.
    pub version: &'static str,
}

const HEALTHY: Health = Health {
    status: "healthy",
    version: env!("CARGO_PKG_VERSION"),
};

/// Public routes that need no token and no database.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(|| async { Json(HEALTHY) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_body_shape() {
        let json = serde_json::to_value(HEALTHY).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["version"].is_string());
    }
}
