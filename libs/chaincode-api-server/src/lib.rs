mod http;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;

use chaincode_api::StateAccessor;
use chaincode_engine::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub state: Arc<dyn StateAccessor>,
}

/// Routes of the invoke API, without a listener.
pub fn router(app: AppState) -> Router {
    Router::new()
        .route("/api/invoke", post(http::handle_invoke))
        .route("/api/operations", get(http::handle_list_operations))
        .with_state(app)
}

/// HTTP invoke server. Runs until `shutdown` is cancelled.
pub async fn run(port: u16, app: AppState, shutdown: CancellationToken) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| format!("bind api :{port}: {e}"))?;
    tracing::info!(port, "invoke api listening");

    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| format!("axum serve: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use storage_memory::MemoryState;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            dispatcher: Arc::new(Dispatcher::new()),
            state: Arc::new(MemoryState::new()),
        })
    }

    fn invoke(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/invoke")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn invoke_returns_payload_on_success() {
        let app = app();
        let resp = app.clone().oneshot(invoke(r#"{"function":"initLedger"}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(invoke(r#"{"function":"queryImage","args":["IMG2"]}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["Owner"], "Max");
    }

    #[tokio::test]
    async fn invoke_failure_is_500_with_message() {
        let resp = app()
            .oneshot(invoke(r#"{"function":"doesNotExist"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(resp).await, "unknown operation 'doesNotExist'");
    }

    #[tokio::test]
    async fn lists_operations() {
        let req = Request::builder().uri("/api/operations").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let names: Vec<String> = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(names.len(), 5);
        assert!(names.iter().any(|n| n == "transferImage"));
    }
}
