//! LensLink chunked transfer reassembly protocol reference implementation.
//! Host-driven: no I/O; the host pushes raw notification frames in and
//! receives engine events out.

pub mod chunk;
pub mod engine;
pub mod frame;
pub mod session;

pub use chunk::{split_into_frames, ChunkError, DEFAULT_CHUNK_SIZE};
pub use engine::{EngineEvent, ReceiverEngine, DEFAULT_TIMEOUT_TICKS};
pub use frame::{
    decode_frame, encode_data_frame, encode_end_frame, Frame, FrameDecodeError, FrameEncodeError,
    END_SENTINEL, MAX_FRAME_INDEX,
};
pub use session::TransferSession;
