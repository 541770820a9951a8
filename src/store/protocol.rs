//! Store Command Protocol
//!
//! Defines the command set and reply shapes the service expects from its
//! hash/sorted-set store. The index and catalog layers speak only this
//! vocabulary; `memory.rs` is the in-process backend that executes it.
//!
//! Replies distinguish a missing value (`Reply::Nil`) from an empty string,
//! which the catalog relies on when probing for document existence.

use anyhow::{Result, anyhow};

/// A single store operation. Commands are either run eagerly or appended to
/// a client's pipeline buffer and drained in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Read one hash field.
    HGet { key: String, field: String },
    /// Write one hash field, creating the hash if needed.
    HSet {
        key: String,
        field: String,
        value: String,
    },
    /// Remove one hash field.
    HDel { key: String, field: String },
    /// Add a signed delta to an integer hash field (missing counts as 0).
    HIncrBy {
        key: String,
        field: String,
        delta: i64,
    },
    /// Read every field of a hash.
    HGetAll { key: String },
    /// Bulk-read hash fields; each position is Nil-aware.
    HMGet { key: String, fields: Vec<String> },
    /// Blind upsert of a scored member into a sorted set.
    ZAdd {
        key: String,
        score: f64,
        member: String,
    },
    /// Remove a member from a sorted set.
    ZRem { key: String, member: String },
    /// Members with scores, highest score first, over an inclusive index
    /// range (negative indexes count from the end).
    ZRevRange { key: String, start: i64, stop: i64 },
    /// Intersect sorted sets into `dest`, keeping each member's maximum
    /// score across the sources. Overwrites `dest`.
    ZInterStore { dest: String, keys: Vec<String> },
    /// Remove a whole key.
    Del { key: String },
}

/// Reply to a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The key or field does not exist.
    Nil,
    /// A string value.
    Text(String),
    /// An integer (counters, membership counts).
    Int(i64),
    /// Positional bulk-read results; `None` marks a missing field.
    Fields(Vec<Option<String>>),
    /// All field/value pairs of a hash.
    Entries(Vec<(String, String)>),
    /// Sorted-set members with their scores.
    Scored(Vec<(String, f64)>),
}

impl Reply {
    /// A present string value, or `None` for Nil.
    pub fn text(self) -> Option<String> {
        match self {
            Reply::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn int(self) -> Result<i64> {
        match self {
            Reply::Int(value) => Ok(value),
            other => Err(anyhow!("expected integer reply, got {:?}", other)),
        }
    }

    pub fn fields(self) -> Result<Vec<Option<String>>> {
        match self {
            Reply::Fields(values) => Ok(values),
            other => Err(anyhow!("expected fields reply, got {:?}", other)),
        }
    }

    pub fn entries(self) -> Result<Vec<(String, String)>> {
        match self {
            Reply::Entries(pairs) => Ok(pairs),
            Reply::Nil => Ok(Vec::new()),
            other => Err(anyhow!("expected entries reply, got {:?}", other)),
        }
    }

    pub fn scored(self) -> Result<Vec<(String, f64)>> {
        match self {
            Reply::Scored(members) => Ok(members),
            Reply::Nil => Ok(Vec::new()),
            other => Err(anyhow!("expected scored reply, got {:?}", other)),
        }
    }
}
