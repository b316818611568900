//! Host-driven reassembly engine: the host pushes raw notification frames and
//! timer ticks in; the engine returns events for the host to act on.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::frame::{self, Frame, FrameDecodeError};
use crate::session::TransferSession;

/// Default transfer deadline in ticks, armed at `start()`. The deadline is
/// measured from session start, not from the last frame: a stalled transfer
/// that keeps dribbling frames without ever reaching the sentinel must still
/// time out.
pub const DEFAULT_TIMEOUT_TICKS: u64 = 30;

/// Event emitted to the presentation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// An ordinary frame was buffered. `highest_index + 1` is the best known
    /// lower bound on the frame count; total size is never transmitted.
    Progress {
        frames_received: u64,
        highest_index: u16,
    },
    /// Sentinel observed; the payload is assembled in ascending index order.
    Completed(Vec<u8>),
    /// No sentinel within the deadline. Session discarded, no payload.
    TimedOut,
    /// External cancel or disconnect while receiving. No payload.
    Cancelled,
    /// A frame too short to hold an index was dropped; session continues.
    MalformedFrameDropped,
}

/// One active transfer: session buffer plus the tick the deadline was armed.
struct ActiveTransfer {
    session: TransferSession,
    started_tick: u64,
}

/// Single-transfer reassembly engine. `None` active transfer means idle.
/// All methods are synchronous and must be serialized by the host if it is
/// multi-threaded; the engine never blocks or suspends.
pub struct ReceiverEngine {
    active: Option<ActiveTransfer>,
    tick_count: u64,
    timeout_ticks: u64,
    completed_transfers: u64,
}

impl ReceiverEngine {
    pub fn new() -> Self {
        Self {
            active: None,
            tick_count: 0,
            timeout_ticks: DEFAULT_TIMEOUT_TICKS,
            completed_transfers: 0,
        }
    }

    /// Set the transfer deadline in ticks for subsequent sessions.
    pub fn set_timeout_ticks(&mut self, ticks: u64) {
        self.timeout_ticks = ticks;
    }

    /// Begin a fresh session and arm the deadline. Calling this while already
    /// receiving silently discards the previous session, frames and all.
    pub fn start(&mut self) {
        if let Some(prev) = self.active.take() {
            debug!(
                "restarting transfer, discarding {} buffered frames",
                prev.session.frames_received()
            );
        }
        self.active = Some(ActiveTransfer {
            session: TransferSession::new(),
            started_tick: self.tick_count,
        });
        debug!("transfer started at tick {}", self.tick_count);
    }

    /// Ingest one raw notification buffer. Frames arriving while idle are
    /// stray data from an earlier transfer and are ignored without an event.
    pub fn ingest(&mut self, bytes: &[u8]) -> Vec<EngineEvent> {
        if self.active.is_none() {
            trace!("ignoring {}-byte frame while idle", bytes.len());
            return Vec::new();
        }
        let frame = match frame::decode_frame(bytes) {
            Ok(f) => f,
            Err(FrameDecodeError::TooShort { len }) => {
                warn!("dropping malformed {len}-byte frame");
                return vec![EngineEvent::MalformedFrameDropped];
            }
        };
        match frame {
            Frame::Data { index, payload } => {
                let Some(active) = self.active.as_mut() else {
                    return Vec::new();
                };
                active.session.store(index, payload.to_vec());
                let highest = active.session.highest_index().unwrap_or(index);
                trace!(
                    "frame {index} buffered ({} bytes total)",
                    active.session.received_bytes()
                );
                vec![EngineEvent::Progress {
                    frames_received: active.session.frames_received(),
                    highest_index: highest,
                }]
            }
            Frame::End => match self.active.take() {
                Some(active) => {
                    let payload = active.session.assemble();
                    self.completed_transfers += 1;
                    debug!(
                        "transfer complete: {} frames, {} bytes",
                        active.session.frames_received(),
                        payload.len()
                    );
                    vec![EngineEvent::Completed(payload)]
                }
                None => Vec::new(),
            },
        }
    }

    /// Cancel the in-flight transfer (host calls this on external cancel or
    /// disconnect). No-op while idle.
    pub fn cancel(&mut self) -> Vec<EngineEvent> {
        match self.active.take() {
            Some(prev) => {
                debug!(
                    "transfer cancelled, discarding {} buffered frames",
                    prev.session.frames_received()
                );
                vec![EngineEvent::Cancelled]
            }
            None => Vec::new(),
        }
    }

    /// Advance the engine clock one tick and fire the deadline if it has
    /// elapsed while still receiving. A tick after completion is a no-op;
    /// the guard is the only path to a timeout.
    pub fn tick(&mut self) -> Vec<EngineEvent> {
        self.tick_count = self.tick_count.saturating_add(1);
        let deadline_hit = self
            .active
            .as_ref()
            .map(|a| self.tick_count.saturating_sub(a.started_tick) >= self.timeout_ticks)
            .unwrap_or(false);
        if deadline_hit {
            self.active = None;
            warn!("transfer timed out at tick {}", self.tick_count);
            return vec![EngineEvent::TimedOut];
        }
        Vec::new()
    }

    /// Whether a session is active.
    pub fn is_receiving(&self) -> bool {
        self.active.is_some()
    }

    /// Ordinary frames buffered in the current session (0 while idle).
    pub fn frames_received(&self) -> u64 {
        self.active
            .as_ref()
            .map(|a| a.session.frames_received())
            .unwrap_or(0)
    }

    /// Payload bytes buffered in the current session (0 while idle).
    pub fn received_bytes(&self) -> usize {
        self.active
            .as_ref()
            .map(|a| a.session.received_bytes())
            .unwrap_or(0)
    }

    /// Largest frame index seen in the current session, if any.
    pub fn highest_index(&self) -> Option<u16> {
        self.active.as_ref().and_then(|a| a.session.highest_index())
    }

    /// Transfers completed since this engine was created.
    pub fn completed_transfers(&self) -> u64 {
        self.completed_transfers
    }
}

impl Default for ReceiverEngine {
    fn default() -> Self {
        Self::new()
    }
}
