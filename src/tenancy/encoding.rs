//! Namespace Encoding
//!
//! Every domain, URL and group name is folded into a short opaque label
//! before it touches a store key, so tenants can neither collide with nor
//! enumerate each other through the keyspace.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use md5::{Digest, Md5};

/// Label width in characters. Six base64 characters carry ~36 bits;
/// collisions are scoped (a URL collision only overwrites within its own
/// domain) but deployments above ~10^5 domains or URLs per domain should
/// widen this before first use, since the width is baked into every
/// persisted key.
pub const LABEL_LEN: usize = 6;

/// Opaque fixed-width label for a domain, URL or group name.
pub fn encode(name: &str) -> String {
    let digest = Md5::digest(name.as_bytes());
    URL_SAFE.encode(digest)[..LABEL_LEN].to_string()
}
