//! Length-prefixed message framing for rpcprims.
//!
//! Every message on the wire is framed as:
//! - A 4-byte big-endian unsigned payload length
//! - Exactly that many payload bytes
//!
//! No partial reads, no buffer management in user code. A reader never
//! consumes bytes beyond the frame it is assembling.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::RpcFrameCodec;
pub use codec::{decode_frame, encode_frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use reader::{read_frame, FrameReader};
pub use writer::{write_frame, FrameWriter};
