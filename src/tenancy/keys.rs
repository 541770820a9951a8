//! Auth-Key Resolution
//!
//! Tenants are pre-provisioned as entries in the `$domainkeys` hash, which
//! maps an opaque secret key to the domain it controls. Authentication is
//! that single lookup; there are no sessions or tokens.

use crate::store::memory::StoreClient;
use crate::store::protocol::Command;
use anyhow::Result;
use axum::http::HeaderMap;

pub const DOMAIN_KEYS: &str = "$domainkeys";

/// The `AUTH-KEY` request header, if present and non-empty.
pub fn auth_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("auth-key")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Resolve an auth key to the domain it controls. `None` means the key is
/// unknown (or maps to nothing), which callers reject as forbidden.
pub fn resolve_domain(client: &mut StoreClient, key: &str) -> Result<Option<String>> {
    let reply = client.run(Command::HGet {
        key: DOMAIN_KEYS.to_string(),
        field: key.to_string(),
    })?;
    Ok(reply.text().filter(|domain| !domain.is_empty()))
}
