//! The storage collaborators.
//!
//! Both traits take `&self`: a store is shared between the sniffer,
//! which writes mirrored messages, and the archiver, which consumes
//! them. Implementations synchronise internally.

use std::sync::Arc;
use std::time::Duration;

use crate::StoreError;

/// The list commands a rule can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushCommand {
    /// Push to the head.
    Lpush,
    /// Push to the head, only if the list exists.
    Lpushx,
    /// Push to the tail.
    Rpush,
    /// Push to the tail, only if the list exists.
    Rpushx,
}

impl PushCommand {
    pub fn to_head(self) -> bool {
        matches!(self, Self::Lpush | Self::Lpushx)
    }

    pub fn requires_existing(self) -> bool {
        matches!(self, Self::Lpushx | Self::Rpushx)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub expiry: Option<Duration>,
    pub nx: bool,
    pub xx: bool,
}

/// A byte-oriented list and key-value store.
pub trait QueueStore {
    /// Pushes `value` onto the list at `key`. Returns the new length,
    /// or 0 when an `X` command found no list.
    async fn push(&self, command: PushCommand, key: &str, value: Vec<u8>)
    -> Result<usize, StoreError>;

    /// Pops the head of the list at `key`, if any.
    async fn pop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Pops the head of the list at `key`, waiting for one to arrive.
    async fn blocking_pop(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` at `key`. Returns `false` when `nx`/`xx` blocked
    /// the write.
    async fn set(&self, key: &str, value: Vec<u8>, options: SetOptions)
    -> Result<bool, StoreError>;
}

/// An object store addressed by `/`-separated keys.
pub trait BlobStore {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// # Errors
    /// Returns [`StoreError::NotFound`] for a missing key.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Keys starting with `prefix`, in lexicographic order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Shared handles
// ---------------------------------------------------------------------------

impl<T: QueueStore + ?Sized> QueueStore for Arc<T> {
    async fn push(
        &self,
        command: PushCommand,
        key: &str,
        value: Vec<u8>,
    ) -> Result<usize, StoreError> {
        (**self).push(command, key, value).await
    }

    async fn pop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).pop(key).await
    }

    async fn blocking_pop(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).blocking_pop(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: SetOptions) -> Result<bool, StoreError> {
        (**self).set(key, value, options).await
    }
}

impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).list(prefix).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}
