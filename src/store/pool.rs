//! Store Client Pool
//!
//! A bounded pool of store clients. Every request checks out exactly one
//! client for its duration and the guard returns it on all exit paths; a
//! client that has observed an error is dropped on the floor and a fresh
//! one takes its slot on the next checkout.

use super::memory::{MemoryStore, StoreClient};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub struct StorePool {
    store: Arc<MemoryStore>,
    idle: Mutex<Vec<StoreClient>>,
    permits: Arc<Semaphore>,
}

impl StorePool {
    pub fn new(store: Arc<MemoryStore>, size: usize) -> Arc<Self> {
        Arc::new(Self {
            store,
            idle: Mutex::new(Vec::with_capacity(size)),
            permits: Arc::new(Semaphore::new(size)),
        })
    }

    /// Check out a client, waiting if the pool is exhausted.
    pub async fn get(self: &Arc<Self>) -> PooledClient {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("store pool semaphore closed");
        let client = self
            .idle
            .lock()
            .expect("store pool mutex poisoned")
            .pop()
            .unwrap_or_else(|| StoreClient::new(self.store.clone()));
        PooledClient {
            client: Some(client),
            pool: self.clone(),
            _permit: permit,
        }
    }

    fn put_back(&self, client: StoreClient) {
        self.idle
            .lock()
            .expect("store pool mutex poisoned")
            .push(client);
    }

    #[cfg(test)]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().expect("store pool mutex poisoned").len()
    }
}

/// Checkout guard. Dereferences to the client; on drop the client goes back
/// to the pool unless it is broken.
pub struct PooledClient {
    client: Option<StoreClient>,
    pool: Arc<StorePool>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledClient {
    type Target = StoreClient;

    fn deref(&self) -> &StoreClient {
        self.client.as_ref().expect("client already returned")
    }
}

impl DerefMut for PooledClient {
    fn deref_mut(&mut self) -> &mut StoreClient {
        self.client.as_mut().expect("client already returned")
    }
}

impl Drop for PooledClient {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            if !client.is_broken() {
                self.pool.put_back(client);
            }
        }
    }
}
