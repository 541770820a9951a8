use super::counters::{document_count, monthly_fetches};
use crate::ingestion::handlers::authenticate;
use crate::ingestion::types::ErrorResponse;
use crate::search::handlers::cors;
use crate::store::pool::StorePool;
use axum::Extension;
use axum::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Serialize)]
pub struct StatsResponse {
    pub documents: i64,
    pub fetches: BTreeMap<String, BTreeMap<String, i64>>,
}

pub async fn handle_stats(
    headers: HeaderMap,
    Extension(pool): Extension<Arc<StorePool>>,
) -> Response {
    let mut client = pool.get().await;
    let domain = match authenticate(&headers, &mut client) {
        Ok(domain) => domain,
        Err(response) => return response,
    };

    let documents = match document_count(&mut client, &domain) {
        Ok(documents) => documents,
        Err(error) => {
            tracing::error!("Document count failed for {}: {}", domain, error);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("stats unavailable")),
            )
                .into_response();
        }
    };
    let fetches = match monthly_fetches(&mut client, &domain) {
        Ok(fetches) => fetches,
        Err(error) => {
            tracing::error!("Fetch rollup failed for {}: {}", domain, error);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("stats unavailable")),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        cors(),
        Json(StatsResponse { documents, fetches }),
    )
        .into_response()
}
