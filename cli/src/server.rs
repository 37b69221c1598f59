use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;

use crate::spoonacular::{API_KEY_VAR, SearchParams, SpoonacularClient};

const BODY_LIMIT: usize = 1024 * 1024; // 1 MB

#[derive(Clone)]
struct AppState {
    spoon: Arc<SpoonacularClient>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Query shape of the proxy endpoint. Field names match the original
/// client-facing API.
#[derive(Deserialize)]
struct SearchQueryParams {
    #[serde(default)]
    query: String,
    #[serde(default)]
    cuisine: String,
    #[serde(default = "default_number")]
    number: u32,
    #[serde(default, rename = "halalApprox")]
    halal_approx: bool,
    /// Comma-separated ingredient list.
    #[serde(default)]
    include: String,
    /// Comma-separated ingredient list.
    #[serde(default)]
    exclude: String,
}

fn default_number() -> u32 {
    12
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

// --- Middleware ---

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}

// --- Handlers ---

async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> Response {
    // No credential configured: a descriptive server error, not a crash.
    if !state.spoon.has_key() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Missing {API_KEY_VAR}"),
            }),
        )
            .into_response();
    }

    let search = SearchParams {
        query: params.query,
        cuisine: params.cuisine,
        number: params.number,
        halal_approx: params.halal_approx,
        include: split_csv(&params.include),
        exclude: split_csv(&params.exclude),
    };

    match state.spoon.search_raw(&search).await {
        Ok((status, body)) => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (code, Json(body)).into_response()
        }
        Err(err) => {
            eprintln!("Spoonacular proxy error: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Upstream search failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[must_use]
pub fn router(spoon: Arc<SpoonacularClient>) -> Router {
    let state = AppState { spoon };
    Router::new()
        .route("/api/spoonacular/search", get(search_recipes))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .with_state(state)
}

pub async fn start_server(spoon: Arc<SpoonacularClient>, port: u16, bind: &str) -> Result<()> {
    if !spoon.has_key() {
        eprintln!("Warning: {API_KEY_VAR} is not set; searches will return an error payload");
    }
    let app = router(spoon);
    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    println!("mealweek search proxy listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .context("Server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn keyless_router() -> Router {
        router(Arc::new(SpoonacularClient::with_api_key(None)))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_returns_descriptive_500() {
        let app = keyless_router();
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/spoonacular/search?query=chicken")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing SPOONACULAR_KEY");
    }

    #[tokio::test]
    async fn test_query_params_are_optional() {
        let app = keyless_router();
        // All params defaulted; still reaches the credential check.
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/spoonacular/search")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let app = keyless_router();
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/spoonacular/search")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = keyless_router();
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/nope")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_csv("").is_empty());
    }
}
