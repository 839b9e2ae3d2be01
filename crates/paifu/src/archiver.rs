//! The archive loop: mirrored `fetchGameRecord` responses into blob
//! storage.
//!
//! Each pop refreshes the heartbeat, checks the envelope, validates the
//! response and writes it under a key derived from the game's start time:
//!
//! ```text
//! game-detail/%Y/%m/%d  +  2021-03-14, "210314-..."  ─►  game-detail/2021/03/14/210314-...
//! ```

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use paifu_capture::Direction;
use paifu_mirror::{BlobStore, MirroredMessage, QueueStore, heartbeat};
use paifu_record::build_game_record;
use paifu_schema::{game_abstract, validate_game_detail};
use tokio::time::Instant;

use crate::{ArchiveConfig, PaifuError};

/// Where one game was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archived {
    pub uuid: String,
    pub detail_key: String,
    pub record_key: Option<String>,
}

pub struct Archiver<Q, B> {
    config: ArchiveConfig,
    queue: Q,
    blobs: B,
}

impl<Q: QueueStore, B: BlobStore> Archiver<Q, B> {
    pub fn new(config: ArchiveConfig, queue: Q, blobs: B) -> Self {
        Self {
            config,
            queue,
            blobs,
        }
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Archives messages until one fails.
    pub async fn run(&self) -> Result<(), PaifuError> {
        loop {
            self.archive_next().await?;
        }
    }

    /// Waits for the next mirrored message and archives it.
    pub async fn archive_next(&self) -> Result<Archived, PaifuError> {
        let raw = self.queue.blocking_pop(&self.config.queue_key).await?;
        heartbeat(&self.queue, &self.config.heartbeat_key, Utc::now()).await?;
        self.archive(&raw).await
    }

    /// Archives one mirrored message.
    pub async fn archive(&self, raw: &[u8]) -> Result<Archived, PaifuError> {
        let fetched = Instant::now();
        let message = MirroredMessage::decode(raw)?;
        if message.request_direction != Direction::Outbound {
            return Err(PaifuError::UnexpectedDirection(message.request_direction));
        }
        let response = message
            .response
            .ok_or_else(|| PaifuError::MissingResponse(self.config.queue_key.clone()))?;

        let (uuid, start_time, record) = match &self.config.record_prefix {
            Some(_) => {
                let game = build_game_record(&response, self.config.validate)?;
                let json = game.to_json().map_err(PaifuError::Serialize)?;
                let record = serde_json::to_vec(&json).map_err(PaifuError::Serialize)?;
                (game.uuid().to_owned(), game.start_time(), Some(record))
            }
            None => {
                if self.config.validate {
                    validate_game_detail(&response)?;
                }
                let head = game_abstract(&response)?;
                (head.uuid, head.start_time, None)
            }
        };
        tracing::info!(
            %uuid,
            elapsed = ?fetched.elapsed(),
            validated = self.config.validate,
            "Elapsed time to validate the message"
        );

        let detail_key = object_key(&self.config.detail_prefix, start_time, &uuid)?;
        self.blobs.put(&detail_key, response).await?;
        tracing::debug!(key = %detail_key, "stored game detail");

        let record_key = match (&self.config.record_prefix, record) {
            (Some(prefix), Some(record)) => {
                let key = object_key(prefix, start_time, &format!("{uuid}.json"))?;
                self.blobs.put(&key, record).await?;
                tracing::debug!(%key, "stored game record");
                Some(key)
            }
            _ => None,
        };

        Ok(Archived {
            uuid,
            detail_key,
            record_key,
        })
    }
}

/// `strftime(prefix, start_time)/name`, ignoring trailing slashes on
/// `prefix`.
pub fn object_key(prefix: &str, start_time: DateTime<Utc>, name: &str) -> Result<String, PaifuError> {
    let mut key = String::new();
    write!(key, "{}", start_time.format(prefix.trim_end_matches('/')))
        .map_err(|_| PaifuError::InvalidConfig(format!("{prefix}: an invalid key template")))?;
    key.push('/');
    key.push_str(name);
    Ok(key)
}
