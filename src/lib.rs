//! Typeahead Autocomplete Service Library
//!
//! This library crate defines the core modules that make up the service.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`search`**: The prefix-index engine. Tokenization and transliteration
//!   expansion, prefix generation with the completed-word marker, the
//!   catalog/index mutation choreography, and the query planner.
//! - **`ingestion`**: The authenticated write surface. Binds and validates
//!   update, bulk, delete and flush requests and feeds them to the index
//!   writer.
//! - **`tenancy`**: Tenant identity. Auth-key resolution and the namespace
//!   encoding that isolates every domain, URL and group in the keyspace.
//! - **`stats`**: Per-domain lifetime document counts and monthly fetch
//!   counters, rolled up for the stats endpoint.
//! - **`store`**: The hash/sorted-set store contract, its in-memory
//!   backend, and the bounded client pool requests draw from.

pub mod ingestion;
pub mod search;
pub mod stats;
pub mod store;
pub mod tenancy;
