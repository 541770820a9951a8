use super::engine::search_titles;
use crate::ingestion::types::{ErrorResponse, FieldError, ValidationErrors};
use crate::store::pool::StorePool;
use axum::extract::Query;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

/// Public endpoints answer to browsers on other origins.
pub fn cors() -> [(HeaderName, HeaderValue); 1] {
    [(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    )]
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub d: String,
    pub n: Option<i64>,
    pub g: Option<String>,
}

pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(pool): Extension<Arc<StorePool>>,
) -> Response {
    let domain = params.d.trim();
    if domain.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrors {
                errors: vec![FieldError::empty_field("d")],
            }),
        )
            .into_response();
    }
    let query = params.q.trim();

    let n = match params.n {
        Some(number) if number > 0 => number as usize,
        _ => 10,
    };

    let mut groups: Vec<String> = params
        .g
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter(|group| !group.is_empty())
        .map(str::to_string)
        .collect();
    // Deterministic merge order when several groups contribute results.
    groups.sort();

    let mut client = pool.get().await;
    match search_titles(&mut client, domain, query, &groups, n) {
        Ok(response) => (StatusCode::OK, cors(), Json(response)).into_response(),
        Err(error) => {
            tracing::error!("Search failed for domain {}: {}", domain, error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("search failed")),
            )
                .into_response()
        }
    }
}
