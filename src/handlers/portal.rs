// handlers/portal.rs - Placeholder pages for both audiences
//
// The real page and CRUD handlers live outside this service; these stand in
// for them so the gate can be exercised end to end.

use axum::{extract::Extension, http::Uri};
use serde::Serialize;

use crate::gate::Session;
use crate::middleware::ApiResponse;
use crate::types::SessionState;

#[derive(Debug, Serialize)]
pub struct PageView {
    pub path: String,
    pub session: Option<Session>,
    pub state: SessionState,
}

/// GET /admin[/*], /client[/*]
pub async fn page(uri: Uri, session: Option<Extension<Session>>) -> ApiResponse<PageView> {
    let session = session.map(|Extension(s)| s);
    let state = session
        .as_ref()
        .map(Session::state)
        .unwrap_or(SessionState::Unauthenticated);

    ApiResponse::success(PageView {
        path: uri.path().to_string(),
        session,
        state,
    })
}
