//! Stats Module
//!
//! Two counters per domain: a lifetime document count maintained by the
//! index writer, and monthly fetch counts bumped on every search. The
//! stats endpoint rolls them up from the service's epoch year onward.

pub mod counters;
pub mod handlers;
