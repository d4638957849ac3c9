// File: src/endpoint.rs
// Purpose: Axum route for remote validation requests

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};

use formbridge::{
    AuthoritativeValidator, BridgeError, FormbridgeConfig, RemoteRequest, RemoteValidationBridge,
};

use crate::assets::serve_runtime_js;

/// Shared, immutable state for the remote endpoint. The conversion
/// engine is per-request and never lives here; only configuration and
/// the authoritative validator are shared across requests.
#[derive(Clone)]
pub struct RemoteState {
    pub config: Arc<FormbridgeConfig>,
    pub validator: Arc<dyn AuthoritativeValidator + Send + Sync>,
}

impl RemoteState {
    pub fn new(
        config: FormbridgeConfig,
        validator: Arc<dyn AuthoritativeValidator + Send + Sync>,
    ) -> Self {
        if config.uses_default_secret() {
            tracing::warn!("formbridge is using the development token secret; set token_secret for production");
        }
        Self {
            config: Arc::new(config),
            validator,
        }
    }
}

/// Router serving `POST <route_prefix>/:rule` plus the embedded client
/// runtime adapter at `<route_prefix>/runtime.js`.
///
/// Routes are built as full paths rather than nested, so a root
/// (`"/"`) prefix mounts at the root instead of panicking.
pub fn router(state: RemoteState) -> Router {
    let prefix = state.config.route_prefix.trim_end_matches('/').to_string();

    Router::new()
        .route(&format!("{}/runtime.js", prefix), get(serve_runtime_js))
        .route(&format!("{}/:rule", prefix), post(remote_validate))
        .with_state(state)
}

/// One remote validation request: decode the params token, re-run the
/// authoritative validator, answer JSON `true` or the first failing
/// field's message.
async fn remote_validate(
    State(state): State<RemoteState>,
    Path(rule): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    Form(body): Form<Vec<(String, String)>>,
) -> Response {
    // The client may carry the params token in the URL (as emitted in
    // the directive) or in the posted body; body entries win.
    let mut pairs = query;
    pairs.extend(body);
    let request = RemoteRequest::from_pairs(pairs);

    let secret = state.config.secret();
    let bridge = RemoteValidationBridge::new(&secret, state.validator.as_ref());

    match bridge.handle(&rule, &request) {
        Ok(outcome) => Json(outcome.to_json()).into_response(),
        Err(BridgeError::Decode(_)) => {
            // Generic rejection only; detail here would let a client
            // probe the token scheme.
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!("This field could not be validated.")),
            )
                .into_response()
        }
        Err(err @ BridgeError::Validator(_)) => {
            tracing::error!(rule = %rule, error = ?err, "remote validation failed server-side");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
