//! Transfer session: index-keyed frame buffer for one in-progress reassembly.

use std::collections::BTreeMap;

use crate::frame::MAX_FRAME_INDEX;

/// Mutable state of one in-progress reassembly. Frames are keyed by index in
/// a sparse ordered map; expected payloads are small relative to the 65535
/// possible indices, so no full-table allocation per transfer.
#[derive(Debug, Default)]
pub struct TransferSession {
    /// Payloads received so far (frame index -> payload). Last write wins.
    frames: BTreeMap<u16, Vec<u8>>,
    /// Largest ordinary frame index seen; determines the assembly range.
    highest_index: Option<u16>,
    /// Total payload bytes currently buffered.
    received_bytes: usize,
    /// Ordinary frames ingested, duplicates included.
    frames_received: u64,
}

impl TransferSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a payload at `index`, replacing any earlier payload for the
    /// same index. `index` must be an ordinary frame index, not the sentinel.
    pub fn store(&mut self, index: u16, payload: Vec<u8>) {
        debug_assert!(index <= MAX_FRAME_INDEX);
        self.frames_received += 1;
        self.received_bytes += payload.len();
        if let Some(old) = self.frames.insert(index, payload) {
            // Duplicate index: the replaced payload no longer counts.
            self.received_bytes -= old.len();
        }
        if self.highest_index.map_or(true, |h| index > h) {
            self.highest_index = Some(index);
        }
    }

    /// Concatenate buffered payloads in ascending index order over
    /// `0..=highest`. A gap (index never received) contributes zero bytes,
    /// so a lossy transfer assembles to a shorter payload rather than
    /// failing here; content validation is the consumer's job.
    pub fn assemble(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.received_bytes);
        for payload in self.frames.values() {
            out.extend_from_slice(payload);
        }
        out
    }

    pub fn highest_index(&self) -> Option<u16> {
        self.highest_index
    }

    pub fn received_bytes(&self) -> usize {
        self.received_bytes
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_assembles_empty() {
        let session = TransferSession::new();
        assert!(session.assemble().is_empty());
        assert_eq!(session.highest_index(), None);
        assert_eq!(session.received_bytes(), 0);
    }

    #[test]
    fn out_of_order_assembles_by_index() {
        let mut session = TransferSession::new();
        session.store(2, vec![5, 6]);
        session.store(0, vec![1, 2]);
        session.store(1, vec![3, 4]);
        assert_eq!(session.assemble(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(session.highest_index(), Some(2));
        assert_eq!(session.frames_received(), 3);
    }

    #[test]
    fn gap_contributes_nothing() {
        let mut session = TransferSession::new();
        session.store(0, vec![0x01]);
        session.store(2, vec![0x03]);
        let payload = session.assemble();
        assert_eq!(payload, vec![0x01, 0x03]);
        assert_eq!(payload.len(), session.received_bytes());
    }

    #[test]
    fn duplicate_last_write_wins() {
        let mut session = TransferSession::new();
        session.store(0, vec![1, 2, 3]);
        session.store(0, vec![9]);
        assert_eq!(session.assemble(), vec![9]);
        assert_eq!(session.received_bytes(), 1);
        // Duplicates still count as received frames.
        assert_eq!(session.frames_received(), 2);
    }

    #[test]
    fn highest_index_never_shrinks() {
        let mut session = TransferSession::new();
        session.store(5, vec![1]);
        session.store(1, vec![2]);
        assert_eq!(session.highest_index(), Some(5));
    }

    #[test]
    fn zero_length_payload_buffered() {
        let mut session = TransferSession::new();
        session.store(0, vec![]);
        session.store(1, vec![7]);
        assert_eq!(session.assemble(), vec![7]);
        assert_eq!(session.frames_received(), 2);
        assert!(!session.is_empty());
    }
}
