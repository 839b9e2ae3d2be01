//! In-process stores for tests and offline replay.

use std::collections::{BTreeMap, HashMap, VecDeque};

use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use crate::StoreError;
use crate::store::{BlobStore, PushCommand, QueueStore, SetOptions};

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Tables {
    lists: HashMap<String, VecDeque<Vec<u8>>>,
    values: HashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Tables {
    fn live_value(&mut self, key: &str) -> Option<&Entry> {
        let expired = self
            .values
            .get(key)
            .and_then(|e| e.expires_at)
            .is_some_and(|at| at <= Instant::now());
        if expired {
            self.values.remove(key);
        }
        self.values.get(key)
    }

    fn pop(&mut self, key: &str) -> Option<Vec<u8>> {
        let list = self.lists.get_mut(key)?;
        let value = list.pop_front();
        // An emptied list no longer exists.
        if list.is_empty() {
            self.lists.remove(key);
        }
        value
    }
}

/// Lists and values behind one lock. Blocked pops wake on every push.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    tables: Mutex<Tables>,
    pushed: Notify,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the list at `key`.
    pub async fn len(&self, key: &str) -> usize {
        self.tables.lock().await.lists.get(key).map_or(0, VecDeque::len)
    }
}

impl QueueStore for MemoryQueue {
    async fn push(
        &self,
        command: PushCommand,
        key: &str,
        value: Vec<u8>,
    ) -> Result<usize, StoreError> {
        let mut tables = self.tables.lock().await;
        if command.requires_existing() && !tables.lists.contains_key(key) {
            return Ok(0);
        }
        let list = tables.lists.entry(key.to_owned()).or_default();
        if command.to_head() {
            list.push_front(value);
        } else {
            list.push_back(value);
        }
        let len = list.len();
        drop(tables);
        self.pushed.notify_waiters();
        Ok(len)
    }

    async fn pop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables.lock().await.pop(key))
    }

    async fn blocking_pop(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        loop {
            // Register before checking so a push in between is not missed.
            let pushed = self.pushed.notified();
            tokio::pin!(pushed);
            pushed.as_mut().enable();

            if let Some(value) = self.tables.lock().await.pop(key) {
                return Ok(value);
            }
            tracing::trace!(key, "waiting for a push");
            pushed.await;
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.live_value(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: SetOptions) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let exists = tables.live_value(key).is_some();
        if (options.nx && exists) || (options.xx && !exists) {
            return Ok(false);
        }
        tables.values.insert(
            key.to_owned(),
            Entry {
                value,
                expires_at: options.expiry.map(|d| Instant::now() + d),
            },
        );
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Blobs
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.objects.lock().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let objects = self.objects.lock().await;
        Ok(objects
            .range(prefix.to_owned()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.objects
            .lock()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }
}
