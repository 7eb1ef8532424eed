use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use crate::gate::{Gate, GateRequest};
use crate::types::{Audience, Decision};

/// Access gate middleware, mounted in front of every route
///
/// Reads the audience cookies, asks the gate for a decision, and either
/// forwards the request (with the verified `Session` in its extensions) or
/// answers with a 307 redirect. It never produces an error response.
pub async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    let gate_request = GateRequest {
        path: &path,
        admin_token: jar.get(Audience::Admin.cookie_name()).map(|c| c.value()),
        client_token: jar.get(Audience::Client.cookie_name()).map(|c| c.value()),
    };
    let verdict = gate.evaluate(&gate_request, Utc::now());

    match verdict.decision {
        Decision::Continue => {
            if let Some(session) = verdict.session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        // Redirect targets are validated route paths or percent-encoded
        // subject paths, so they are always valid header values.
        Decision::RedirectTo(location) => Redirect::temporary(&location).into_response(),
    }
}
