use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::app_state::AppState;

/// Header carrying the client key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Flat allowlist of client keys.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys(HashSet<String>);

impl ApiKeys {
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ApiKeys {
    /// Keys are trimmed; blank keys are dropped.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|k| k.into().trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    Missing,
    Invalid,
}

impl AuthRejection {
    fn detail(self) -> &'static str {
        match self {
            Self::Missing => "Missing API key",
            Self::Invalid => "Invalid API key",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "detail": self.detail() })),
        )
            .into_response()
    }
}

/// Check the request headers against the allowlist.
///
/// # Errors
///
/// Returns the [`AuthRejection`] to send back when the key is absent or unknown.
pub fn verify_client_key(keys: &ApiKeys, headers: &HeaderMap) -> Result<(), AuthRejection> {
    let Some(value) = headers.get(API_KEY_HEADER) else {
        return Err(AuthRejection::Missing);
    };
    let key = value.to_str().map_err(|_| AuthRejection::Invalid)?;
    if key.is_empty() {
        return Err(AuthRejection::Missing);
    }
    if keys.contains(key) {
        Ok(())
    } else {
        Err(AuthRejection::Invalid)
    }
}

/// Middleware rejecting requests without a recognised client key.
pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match verify_client_key(&state.api_keys, req.headers()) {
        Ok(()) => next.run(req).await,
        Err(rejection) => {
            tracing::warn!(path = %req.uri().path(), "rejected request: {}", rejection.detail());
            rejection.into_response()
        }
    }
}
