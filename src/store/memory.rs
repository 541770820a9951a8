//! In-Memory Store Backend
//!
//! Executes the command protocol against process-local state. Keys are
//! typed: a key holds either a hash or a sorted set, and a command of the
//! wrong kind fails the same way a networked store would reject it.
//!
//! Empty hashes and sorted sets are reclaimed when their last member is
//! removed, so a flushed domain leaves no key residue behind.

use super::protocol::{Command, Reply};
use anyhow::{Result, anyhow};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

enum Value {
    Hash(HashMap<String, String>),
    SortedSet(HashMap<String, f64>),
}

pub struct MemoryStore {
    data: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            data: DashMap::new(),
        })
    }

    /// Number of live keys. Empty structures never linger, so this is the
    /// count a keyspace scan would see.
    pub fn key_count(&self) -> usize {
        self.data.len()
    }

    pub fn execute(&self, command: &Command) -> Result<Reply> {
        match command {
            Command::HGet { key, field } => {
                let Some(entry) = self.data.get(key) else {
                    return Ok(Reply::Nil);
                };
                let Value::Hash(map) = entry.value() else {
                    return Err(wrong_type(key));
                };
                Ok(map
                    .get(field)
                    .map(|value| Reply::Text(value.clone()))
                    .unwrap_or(Reply::Nil))
            }
            Command::HSet { key, field, value } => {
                let mut entry = self
                    .data
                    .entry(key.clone())
                    .or_insert_with(|| Value::Hash(HashMap::new()));
                let Value::Hash(map) = entry.value_mut() else {
                    return Err(wrong_type(key));
                };
                let added = map.insert(field.clone(), value.clone()).is_none();
                Ok(Reply::Int(added as i64))
            }
            Command::HDel { key, field } => {
                let (removed, emptied) = match self.data.get_mut(key) {
                    None => (0, false),
                    Some(mut entry) => {
                        let Value::Hash(map) = entry.value_mut() else {
                            return Err(wrong_type(key));
                        };
                        let removed = map.remove(field).is_some() as i64;
                        (removed, map.is_empty())
                    }
                };
                if emptied {
                    self.data.remove(key);
                }
                Ok(Reply::Int(removed))
            }
            Command::HIncrBy { key, field, delta } => {
                let mut entry = self
                    .data
                    .entry(key.clone())
                    .or_insert_with(|| Value::Hash(HashMap::new()));
                let Value::Hash(map) = entry.value_mut() else {
                    return Err(wrong_type(key));
                };
                let current = match map.get(field) {
                    Some(raw) => raw
                        .parse::<i64>()
                        .map_err(|_| anyhow!("hash field {}/{} is not an integer", key, field))?,
                    None => 0,
                };
                let next = current + delta;
                map.insert(field.clone(), next.to_string());
                Ok(Reply::Int(next))
            }
            Command::HGetAll { key } => {
                let Some(entry) = self.data.get(key) else {
                    return Ok(Reply::Entries(Vec::new()));
                };
                let Value::Hash(map) = entry.value() else {
                    return Err(wrong_type(key));
                };
                Ok(Reply::Entries(
                    map.iter()
                        .map(|(field, value)| (field.clone(), value.clone()))
                        .collect(),
                ))
            }
            Command::HMGet { key, fields } => {
                let Some(entry) = self.data.get(key) else {
                    return Ok(Reply::Fields(vec![None; fields.len()]));
                };
                let Value::Hash(map) = entry.value() else {
                    return Err(wrong_type(key));
                };
                Ok(Reply::Fields(
                    fields.iter().map(|field| map.get(field).cloned()).collect(),
                ))
            }
            Command::ZAdd { key, score, member } => {
                let mut entry = self
                    .data
                    .entry(key.clone())
                    .or_insert_with(|| Value::SortedSet(HashMap::new()));
                let Value::SortedSet(members) = entry.value_mut() else {
                    return Err(wrong_type(key));
                };
                let added = members.insert(member.clone(), *score).is_none();
                Ok(Reply::Int(added as i64))
            }
            Command::ZRem { key, member } => {
                let (removed, emptied) = match self.data.get_mut(key) {
                    None => (0, false),
                    Some(mut entry) => {
                        let Value::SortedSet(members) = entry.value_mut() else {
                            return Err(wrong_type(key));
                        };
                        let removed = members.remove(member).is_some() as i64;
                        (removed, members.is_empty())
                    }
                };
                if emptied {
                    self.data.remove(key);
                }
                Ok(Reply::Int(removed))
            }
            Command::ZRevRange { key, start, stop } => {
                let ranked = match self.data.get(key) {
                    None => Vec::new(),
                    Some(entry) => {
                        let Value::SortedSet(members) = entry.value() else {
                            return Err(wrong_type(key));
                        };
                        ranked_members(members)
                    }
                };
                Ok(Reply::Scored(slice_range(ranked, *start, *stop)))
            }
            Command::ZInterStore { dest, keys } => {
                let mut sources = Vec::with_capacity(keys.len());
                for key in keys {
                    match self.data.get(key) {
                        None => {
                            // One empty source empties the intersection.
                            self.data.remove(dest);
                            return Ok(Reply::Int(0));
                        }
                        Some(entry) => {
                            let Value::SortedSet(members) = entry.value() else {
                                return Err(wrong_type(key));
                            };
                            sources.push(members.clone());
                        }
                    }
                }
                let Some((first, rest)) = sources.split_first() else {
                    self.data.remove(dest);
                    return Ok(Reply::Int(0));
                };
                let mut result = HashMap::new();
                for (member, score) in first {
                    let mut best = *score;
                    let everywhere = rest.iter().all(|other| match other.get(member) {
                        Some(other_score) => {
                            best = best.max(*other_score);
                            true
                        }
                        None => false,
                    });
                    if everywhere {
                        result.insert(member.clone(), best);
                    }
                }
                let size = result.len() as i64;
                if result.is_empty() {
                    self.data.remove(dest);
                } else {
                    self.data.insert(dest.clone(), Value::SortedSet(result));
                }
                Ok(Reply::Int(size))
            }
            Command::Del { key } => Ok(Reply::Int(self.data.remove(key).is_some() as i64)),
        }
    }
}

/// Score descending, member id descending on ties (the reverse-range rule).
fn ranked_members(members: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = members
        .iter()
        .map(|(member, score)| (member.clone(), *score))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    ranked
}

fn slice_range(ranked: Vec<(String, f64)>, start: i64, stop: i64) -> Vec<(String, f64)> {
    let len = ranked.len() as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start >= len || stop < start {
        return Vec::new();
    }
    ranked[start as usize..=stop as usize].to_vec()
}

fn wrong_type(key: &str) -> anyhow::Error {
    anyhow!("WRONGTYPE operation against key {}", key)
}

/// One checked-out connection to the store.
///
/// `run` executes immediately; `append`/`drain` give the pipelined path the
/// mutation choreography depends on: commands are buffered in submission
/// order and replies come back in that same order. The first failed reply
/// aborts the drain, leaves earlier effects committed, and marks the client
/// so the pool discards it instead of reusing it.
pub struct StoreClient {
    store: Arc<MemoryStore>,
    queued: Vec<Command>,
    broken: bool,
}

impl StoreClient {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            queued: Vec::new(),
            broken: false,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Execute one command eagerly, ahead of anything still buffered.
    pub fn run(&mut self, command: Command) -> Result<Reply> {
        match self.store.execute(&command) {
            Ok(reply) => Ok(reply),
            Err(error) => {
                self.broken = true;
                Err(error)
            }
        }
    }

    /// Buffer a command for the next `drain`.
    pub fn append(&mut self, command: Command) {
        self.queued.push(command);
    }

    /// Execute everything buffered, in order, collecting the replies.
    pub fn drain(&mut self) -> Result<Vec<Reply>> {
        let queued = std::mem::take(&mut self.queued);
        let mut replies = Vec::with_capacity(queued.len());
        for command in &queued {
            match self.store.execute(command) {
                Ok(reply) => replies.push(reply),
                Err(error) => {
                    self.broken = true;
                    return Err(error);
                }
            }
        }
        Ok(replies)
    }
}
