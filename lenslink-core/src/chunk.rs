//! Sender side: split a payload into indexed notification frames.

use crate::frame::{self, FrameEncodeError, MAX_FRAME_INDEX};

/// Default chunk payload size in bytes. A typical negotiated BLE notification
/// budget (ATT MTU 203) minus the 2-byte frame index, rounded down.
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// Split `payload` into encoded data frames in index order, terminated by the
/// end-of-transfer sentinel frame. A `chunk_size` of 0 falls back to
/// [`DEFAULT_CHUNK_SIZE`]. A zero-length payload yields just the sentinel.
pub fn split_into_frames(payload: &[u8], chunk_size: usize) -> Result<Vec<Vec<u8>>, ChunkError> {
    let size = if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    };
    let chunk_count = payload.len().div_ceil(size);
    if chunk_count > MAX_FRAME_INDEX as usize + 1 {
        return Err(ChunkError::TooManyFrames { needed: chunk_count });
    }
    let mut out = Vec::with_capacity(chunk_count + 1);
    for (i, chunk) in payload.chunks(size).enumerate() {
        out.push(frame::encode_data_frame(i as u16, chunk)?);
    }
    out.push(frame::encode_end_frame());
    Ok(out)
}

/// Error splitting a payload into frames.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("payload needs {needed} data frames, protocol allows at most 65535")]
    TooManyFrames { needed: usize },
    #[error("frame encode error: {0}")]
    Encode(#[from] FrameEncodeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{decode_frame, Frame};

    #[test]
    fn split_exact_multiple() {
        let payload = vec![0u8; 90];
        let frames = split_into_frames(&payload, 30).unwrap();
        // 3 data frames + sentinel
        assert_eq!(frames.len(), 4);
        assert!(matches!(decode_frame(&frames[3]).unwrap(), Frame::End));
    }

    #[test]
    fn split_with_remainder() {
        let payload: Vec<u8> = (0..100).collect();
        let frames = split_into_frames(&payload, 30).unwrap();
        assert_eq!(frames.len(), 5);
        match decode_frame(&frames[3]).unwrap() {
            Frame::Data { index, payload } => {
                assert_eq!(index, 3);
                assert_eq!(payload.len(), 10);
            }
            Frame::End => panic!("expected Data"),
        }
    }

    #[test]
    fn split_zero_chunk_size_uses_default() {
        let payload = vec![0u8; DEFAULT_CHUNK_SIZE * 2];
        let frames = split_into_frames(&payload, 0).unwrap();
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn split_empty_payload_is_just_sentinel() {
        let frames = split_into_frames(&[], 30).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(matches!(decode_frame(&frames[0]).unwrap(), Frame::End));
    }

    #[test]
    fn split_indices_ascend_from_zero() {
        let payload = vec![0u8; 50];
        let frames = split_into_frames(&payload, 10).unwrap();
        for (i, bytes) in frames[..frames.len() - 1].iter().enumerate() {
            match decode_frame(bytes).unwrap() {
                Frame::Data { index, .. } => assert_eq!(index as usize, i),
                Frame::End => panic!("sentinel before end"),
            }
        }
    }

    #[test]
    fn split_too_many_frames_rejected() {
        // 65536 one-byte chunks exceeds the 0..=0xFFFE index range.
        let payload = vec![0u8; MAX_FRAME_INDEX as usize + 2];
        assert!(matches!(
            split_into_frames(&payload, 1),
            Err(ChunkError::TooManyFrames { .. })
        ));
        // Exactly 65535 chunks still fits.
        let payload = vec![0u8; MAX_FRAME_INDEX as usize + 1];
        let frames = split_into_frames(&payload, 1).unwrap();
        assert_eq!(frames.len(), MAX_FRAME_INDEX as usize + 2);
    }
}
