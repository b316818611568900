//! Wire format: 2-byte big-endian frame index + raw payload bytes.
//!
//! No length prefix, no checksum, no frame count announced up front. Total
//! size is discovered only by observing the highest index at sentinel time.

/// Reserved index marking end of transfer. Never carries payload.
pub const END_SENTINEL: u16 = 0xFFFF;

/// Largest index an ordinary payload frame may carry.
pub const MAX_FRAME_INDEX: u16 = 0xFFFE;

const INDEX_SIZE: usize = 2;

/// One decoded notification frame, borrowing the payload from the raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Ordinary payload frame at the given assembly position.
    Data { index: u16, payload: &'a [u8] },
    /// End-of-transfer sentinel.
    End,
}

/// Decode one notification buffer into a frame.
/// Bytes after the index on a sentinel frame carry no payload semantics and are ignored.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame<'_>, FrameDecodeError> {
    if bytes.len() < INDEX_SIZE {
        return Err(FrameDecodeError::TooShort { len: bytes.len() });
    }
    let index = u16::from_be_bytes([bytes[0], bytes[1]]);
    if index == END_SENTINEL {
        return Ok(Frame::End);
    }
    Ok(Frame::Data {
        index,
        payload: &bytes[INDEX_SIZE..],
    })
}

/// Encode an ordinary payload frame: index (big-endian) followed by the payload.
pub fn encode_data_frame(index: u16, payload: &[u8]) -> Result<Vec<u8>, FrameEncodeError> {
    if index == END_SENTINEL {
        return Err(FrameEncodeError::IndexReserved);
    }
    let mut out = Vec::with_capacity(INDEX_SIZE + payload.len());
    out.extend_from_slice(&index.to_be_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Encode the end-of-transfer sentinel frame (just the reserved index).
pub fn encode_end_frame() -> Vec<u8> {
    END_SENTINEL.to_be_bytes().to_vec()
}

/// Error decoding a notification buffer (too short to hold an index).
#[derive(Debug, thiserror::Error)]
pub enum FrameDecodeError {
    #[error("frame too short: {len} bytes, need at least 2")]
    TooShort { len: usize },
}

/// Error encoding a payload frame (reserved index).
#[derive(Debug, thiserror::Error)]
pub enum FrameEncodeError {
    #[error("index 0xFFFF is reserved for the end-of-transfer sentinel")]
    IndexReserved,
}
