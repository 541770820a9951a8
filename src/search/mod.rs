//! Search Service Module
//!
//! The core component: turning titles into a prefix index and queries into
//! ranked completions.
//!
//! ## Overview
//! A title is decomposed into tokens, every token into its prefixes, and
//! each prefix becomes a popularity-ordered set in the store, namespaced by
//! tenant (and optionally by group). A query walks the same decomposition
//! in reverse: its terms select prefix sets, multi-term queries intersect
//! them, and the surviving document ids are hydrated from the catalog.
//!
//! ## Submodules
//! - **`tokenizer`**: Text normalization, transliteration expansion, prefix
//!   generation.
//! - **`index`**: The document catalog and the insert/delete/flush
//!   choreography that keeps the derived prefix sets consistent with it.
//! - **`engine`**: The query planner (completed-word marking, per-namespace
//!   ranked fetch, merge, dedup, hydration).
//! - **`handlers`**: The public search endpoint.
//! - **`types`**: Data Transfer Objects for API communication.

pub mod engine;
pub mod handlers;
pub mod index;
pub mod tokenizer;
pub mod types;

#[cfg(test)]
mod tests;
