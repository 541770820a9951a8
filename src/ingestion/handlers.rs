use super::types::{
    BulkRequest, DeleteForm, ErrorResponse, FieldError, MessageResponse, UpdateForm,
    ValidationErrors,
};
use crate::search::index::{delete_document, flush_domain, insert_document};
use crate::store::memory::StoreClient;
use crate::store::pool::StorePool;
use crate::tenancy::keys::{auth_key, resolve_domain};
use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::Form;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

fn forbidden(message: &str) -> Response {
    (StatusCode::FORBIDDEN, Json(ErrorResponse::new(message))).into_response()
}

fn invalid(errors: Vec<FieldError>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ValidationErrors { errors })).into_response()
}

fn internal(context: &str, error: anyhow::Error) -> Response {
    tracing::error!("{}: {}", context, error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("store operation failed")),
    )
        .into_response()
}

/// Resolve the caller's domain from the `AUTH-KEY` header, or produce the
/// 403 the caller gets instead.
pub fn authenticate(headers: &HeaderMap, client: &mut StoreClient) -> Result<String, Response> {
    let Some(key) = auth_key(headers) else {
        return Err(forbidden("Auth-Key header not set"));
    };
    match resolve_domain(client, key) {
        Ok(Some(domain)) => Ok(domain),
        Ok(None) => Err(forbidden("Auth-Key not recognized")),
        Err(error) => Err(internal("Auth-key lookup failed", error)),
    }
}

pub async fn handle_update(
    headers: HeaderMap,
    Extension(pool): Extension<Arc<StorePool>>,
    Form(form): Form<UpdateForm>,
) -> Response {
    let mut client = pool.get().await;
    let domain = match authenticate(&headers, &mut client) {
        Ok(domain) => domain,
        Err(response) => return response,
    };

    let document = match form.validate() {
        Ok(document) => document,
        Err(errors) => return invalid(errors),
    };

    match insert_document(&mut client, &domain, &document) {
        Ok(()) => (StatusCode::CREATED, Json(MessageResponse::ok())).into_response(),
        Err(error) => internal("Insert failed", error),
    }
}

pub async fn handle_bulk(
    headers: HeaderMap,
    Extension(pool): Extension<Arc<StorePool>>,
    body: Bytes,
) -> Response {
    let mut client = pool.get().await;
    let domain = match authenticate(&headers, &mut client) {
        Ok(domain) => domain,
        Err(response) => return response,
    };

    // Deserialized here rather than by an extractor: the auth verdict
    // above must precede any body parsing.
    let request: BulkRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!("Malformed bulk payload for domain {}: {}", domain, error);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("malformed JSON body")),
            )
                .into_response();
        }
    };

    let total = request.documents.len();
    for document in request.documents {
        let document = document.into_document();
        if let Err(error) = insert_document(&mut client, &domain, &document) {
            // Documents already drained stay committed.
            return internal("Bulk insert failed", error);
        }
    }

    tracing::info!("Bulk-indexed {} documents for domain {}", total, domain);
    (StatusCode::CREATED, Json(MessageResponse::ok())).into_response()
}

pub async fn handle_delete(
    headers: HeaderMap,
    Extension(pool): Extension<Arc<StorePool>>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let mut client = pool.get().await;
    let domain = match authenticate(&headers, &mut client) {
        Ok(domain) => domain,
        Err(response) => return response,
    };

    let url = match form.validate() {
        Ok(url) => url,
        Err(errors) => return invalid(errors),
    };

    match delete_document(&mut client, &domain, &url) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("URL not recognized")),
        )
            .into_response(),
        Err(error) => internal("Delete failed", error),
    }
}

pub async fn handle_flush(
    headers: HeaderMap,
    Extension(pool): Extension<Arc<StorePool>>,
) -> Response {
    let mut client = pool.get().await;
    let domain = match authenticate(&headers, &mut client) {
        Ok(domain) => domain,
        Err(response) => return response,
    };

    match flush_domain(&mut client, &domain) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => internal("Flush failed", error),
    }
}
