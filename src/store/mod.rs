//! Store Module
//!
//! The hash/sorted-set store underneath the catalog and the prefix index.
//!
//! ## Core Concepts
//! - **Contract**: `protocol` defines the command vocabulary (hashes, scored
//!   sets, intersection, pipelining) and the Nil-aware reply shapes.
//! - **Backend**: `memory` executes the contract against process-local
//!   typed keys; it is the single piece of shared mutable state.
//! - **Access**: `pool` hands out one client per request and retires any
//!   client that has seen an error.
//!
//! A request pipelines its mutations on its one client; there is no
//! atomicity across commands, only reply ordering.

pub mod memory;
pub mod pool;
pub mod protocol;
