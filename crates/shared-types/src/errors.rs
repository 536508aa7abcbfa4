//! # Error Types
//!
//! Errors raised while framing or unframing wire messages.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a wire frame.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WireError {
    /// The value could not be serialized.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// The bytes are not a valid frame for the expected type.
    #[error("Decoding failed: {0}")]
    Decode(String),

    /// The frame was produced by an incompatible protocol version.
    #[error("Unsupported wire version: received {received}, supported {supported}")]
    UnsupportedVersion { received: u16, supported: u16 },

    /// The frame exceeds the configured size limit.
    #[error("Frame too large: {size} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },
}
