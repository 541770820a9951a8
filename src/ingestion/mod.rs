//! Ingestion Service Module
//!
//! The authenticated write/admin surface of the service.
//!
//! ## Architecture Workflow
//! 1. **Authenticate**: the `AUTH-KEY` header resolves to a domain through
//!    a single store lookup; everything after is scoped to that domain.
//! 2. **Bind**: form and JSON payloads arrive with optional fields and are
//!    validated after trimming; each missing or empty required field
//!    produces a `ComplaintError` entry and fails the request.
//! 3. **Index**: validated documents flow into the catalog and prefix
//!    index through the pipelined writer; bulk requests insert documents
//!    in order, and documents already drained stay committed if a later
//!    one fails.

pub mod handlers;
pub mod types;
