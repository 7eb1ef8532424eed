use axum::{http::Uri, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "ISP Access Gate",
            "version": version,
            "description": "Session gate in front of the back-office and client portal",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "admin": "/admin/* (auth-token cookie)",
                "client": "/client/* (client_token cookie, OTP step)",
            }
        }
    }))
}

/// GET /health - liveness; the gate has no dependencies to probe
pub async fn health() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}

pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
