use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use chaincode_api::{Invocation, Response};

use super::AppState;

// ═══════════════════════════════════════════════════════════════
//  REST: POST /api/invoke  {"function": "...", "args": [...]}
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_invoke(
    State(app): State<AppState>,
    axum::Json(invocation): axum::Json<Invocation>,
) -> impl IntoResponse {
    tracing::debug!(function = %invocation.function, "http invoke");
    let response = app.dispatcher.invoke(app.state.as_ref(), &invocation).await;
    let status = StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response {
        Response::Success { payload } => (status, payload).into_response(),
        Response::Error { message } => (status, message).into_response(),
    }
}

// ═══════════════════════════════════════════════════════════════
//  REST: GET /api/operations
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_list_operations(
    State(app): State<AppState>,
) -> impl IntoResponse {
    axum::Json(app.dispatcher.operations()).into_response()
}
