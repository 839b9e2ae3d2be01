//! Request/response correlation.
//!
//! The [`Demultiplexer`] sees every binary frame of one WebSocket in
//! capture order. Notifications come out immediately; requests wait in
//! the pending table, keyed by sequence number, until their response
//! arrives.
//!
//! ```text
//! outbound 02 07 00 .lq.Lobby.fetchGameRecord ──┐
//!                                               ├─▶ Exchange { request, response }
//! inbound  03 07 00 (empty name)              ──┘
//! ```
//!
//! The pending table is the only state, and it is what makes framing
//! errors fatal: after an unmatched response nothing downstream can be
//! trusted, so the error is returned rather than skipped.

use std::collections::HashMap;

use paifu_capture::Direction;
use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameKind, check_response_body, request_name};
use crate::{Envelope, ProtocolError};

/// What to do when a request reuses a sequence number that is still
/// waiting for its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Log a warning and replace the pending request. The client does
    /// this when it retries.
    #[default]
    Overwrite,
    /// Fail with [`ProtocolError::StaleRequest`].
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemuxConfig {
    pub stale_policy: StalePolicy,
}

/// A correlated message: a notification, or a request with its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Method name, taken from the request.
    pub name: String,
    pub request_direction: Direction,
    /// The request frame exactly as captured.
    pub request: Vec<u8>,
    /// The response frame exactly as captured; `None` for notifications.
    pub response: Option<Vec<u8>>,
}

impl Exchange {
    /// The direction routing tables key on.
    ///
    /// For a request this is where the response went. A notification
    /// has no response, so the same inverse convention applies: an
    /// outbound notification is routed as inbound.
    pub fn disposition_direction(&self) -> Direction {
        self.request_direction.inverse()
    }

    pub fn is_notification(&self) -> bool {
        self.response.is_none()
    }

    /// Decodes the request body.
    pub fn request_envelope(&self) -> Result<Envelope, ProtocolError> {
        body_envelope(&self.request, self.request_direction)
    }

    /// Decodes the response body, if any.
    pub fn response_envelope(&self) -> Result<Option<Envelope>, ProtocolError> {
        self.response
            .as_deref()
            .map(|bytes| body_envelope(bytes, self.request_direction.inverse()))
            .transpose()
    }
}

fn body_envelope(content: &[u8], direction: Direction) -> Result<Envelope, ProtocolError> {
    let frame = Frame::parse(content).map_err(|reason| ProtocolError::MalformedFrame {
        direction,
        reason,
        content: content.to_vec(),
    })?;
    Ok(frame.envelope()?)
}

#[derive(Debug, Clone)]
struct Pending {
    direction: Direction,
    name: String,
    content: Vec<u8>,
}

/// Pairs requests with responses across one connection.
#[derive(Debug, Default)]
pub struct Demultiplexer {
    config: DemuxConfig,
    pending: HashMap<u16, Pending>,
}

impl Demultiplexer {
    pub fn new(config: DemuxConfig) -> Self {
        Self {
            config,
            pending: HashMap::new(),
        }
    }

    /// Number of requests still waiting for a response.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feeds one binary frame.
    ///
    /// Returns the completed exchange, or `None` when the frame was a
    /// request that now waits for its response.
    pub fn feed(
        &mut self,
        direction: Direction,
        content: Vec<u8>,
    ) -> Result<Option<Exchange>, ProtocolError> {
        let frame = match Frame::parse(&content) {
            Ok(frame) => frame,
            Err(reason) => return Err(malformed(direction, reason, content)),
        };

        match (frame.kind, frame.seq) {
            (FrameKind::Notify, _) => {
                let name = match request_name(frame.body) {
                    Ok(name) => name.to_owned(),
                    Err(reason) => return Err(malformed(direction, reason, content)),
                };
                tracing::trace!(%name, %direction, "notification");
                Ok(Some(Exchange {
                    name,
                    request_direction: direction,
                    request: content,
                    response: None,
                }))
            }
            (FrameKind::Request, Some(seq)) => {
                let name = match request_name(frame.body) {
                    Ok(name) => name.to_owned(),
                    Err(reason) => return Err(malformed(direction, reason, content)),
                };
                if let Some(stale) = self.pending.get(&seq) {
                    match self.config.stale_policy {
                        StalePolicy::Overwrite => {
                            tracing::warn!(
                                seq,
                                stale = %stale.name,
                                replacement = %name,
                                "request reused a pending sequence number"
                            );
                        }
                        StalePolicy::Reject => {
                            return Err(ProtocolError::StaleRequest {
                                seq,
                                name: stale.name.clone(),
                            });
                        }
                    }
                }
                tracing::trace!(%name, seq, %direction, "request pending");
                self.pending.insert(
                    seq,
                    Pending {
                        direction,
                        name,
                        content,
                    },
                );
                Ok(None)
            }
            (FrameKind::Response, Some(seq)) => {
                if let Err(reason) = check_response_body(frame.body) {
                    return Err(malformed(direction, reason, content));
                }
                let Some(request) = self.pending.remove(&seq) else {
                    return Err(ProtocolError::UnmatchedResponse {
                        seq,
                        direction,
                        content,
                    });
                };
                if direction != request.direction.inverse() {
                    return Err(ProtocolError::DirectionMismatch {
                        name: request.name,
                        direction,
                    });
                }
                tracing::trace!(name = %request.name, seq, "response matched");
                Ok(Some(Exchange {
                    name: request.name,
                    request_direction: request.direction,
                    request: request.content,
                    response: Some(content),
                }))
            }
            // Frame::parse always sets seq for requests and responses.
            (_, None) => Err(malformed(
                direction,
                crate::MalformedReason::Truncated,
                content,
            )),
        }
    }
}

fn malformed(
    direction: Direction,
    reason: crate::MalformedReason,
    content: Vec<u8>,
) -> ProtocolError {
    ProtocolError::MalformedFrame {
        direction,
        reason,
        content,
    }
}
