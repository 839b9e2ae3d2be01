//! Dispatching correlated exchanges through the routing table.

use chrono::{DateTime, Utc};
use paifu_protocol::Exchange;

use crate::config::{Action, MirrorConfig};
use crate::message::{MirroredMessage, seconds_to_timestamp, timestamp_to_seconds};
use crate::store::{QueueStore, SetOptions};
use crate::{MirrorError, StoreError};

/// What happened to one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No rule for the name, or the rule rejected the direction.
    Unhandled,
    /// A `NOP` rule matched.
    Dropped,
    /// Pushed onto `key`. `len` is the list length afterwards, 0 when an
    /// `X` command found no list.
    Pushed { key: String, len: usize },
    /// `stored` is false when `nx`/`xx` blocked the write.
    Set { key: String, stored: bool },
}

/// Routes exchanges to a queue store.
#[derive(Debug)]
pub struct Mirror<Q> {
    config: MirrorConfig,
    queue: Q,
}

impl<Q: QueueStore> Mirror<Q> {
    pub fn new(config: MirrorConfig, queue: Q) -> Self {
        Self { config, queue }
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Dispatches `exchange`, stamping it with the current time.
    pub async fn dispatch(&self, exchange: &Exchange) -> Result<Dispatch, MirrorError> {
        self.dispatch_at(exchange, Utc::now()).await
    }

    /// Dispatches `exchange`, stamping it with `now`.
    ///
    /// # Errors
    /// Store failures. An unmatched exchange is not an error.
    pub async fn dispatch_at(
        &self,
        exchange: &Exchange,
        now: DateTime<Utc>,
    ) -> Result<Dispatch, MirrorError> {
        let name = exchange.name.as_str();
        let direction = exchange.request_direction;

        let Some(rule) = self
            .config
            .rule(name)
            .filter(|rule| rule.request_direction.accepts(direction))
        else {
            tracing::warn!(name, %direction, "unhandled message");
            return Ok(Dispatch::Unhandled);
        };

        let command = match &rule.action {
            Action::Nop => {
                tracing::trace!(name, %direction, "dropped");
                return Ok(Dispatch::Dropped);
            }
            Action::Command(command) => command,
        };

        let payload = MirroredMessage::from_exchange(exchange, now).encode()?;
        let key = command.key().to_owned();
        let outcome = match command.push_command() {
            Some(push) => {
                let len = self.queue.push(push, &key, payload).await?;
                Dispatch::Pushed { key, len }
            }
            None => {
                let options = command.set_options().unwrap_or_default();
                let stored = self.queue.set(&key, payload, options).await?;
                Dispatch::Set { key, stored }
            }
        };
        tracing::debug!(name, %direction, action = %rule.action, ?outcome, "mirrored");
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Heartbeat
// ---------------------------------------------------------------------------

/// Writes `now` to `key` as float seconds.
pub async fn heartbeat<Q: QueueStore>(
    queue: &Q,
    key: &str,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let value = timestamp_to_seconds(now).to_string().into_bytes();
    queue.set(key, value, SetOptions::default()).await?;
    Ok(())
}

/// Reads back the last heartbeat, or `None` when none was written.
pub async fn read_heartbeat<Q: QueueStore>(
    queue: &Q,
    key: &str,
) -> Result<Option<DateTime<Utc>>, MirrorError> {
    let Some(value) = queue.get(key).await? else {
        return Ok(None);
    };
    let text = String::from_utf8_lossy(&value);
    let seconds: f64 = text
        .trim()
        .parse()
        .map_err(|_| MirrorError::Timestamp(text.clone().into_owned()))?;
    seconds_to_timestamp(seconds).map(Some)
}
