//! # Frame Codec
//!
//! Every value on the wire is wrapped in a versioned frame and encoded with
//! bincode. The same options are used for both directions so the encoding is
//! deterministic: signing the output of [`encode`] and later decoding it yields
//! the same value on every peer.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::WireError;

/// Current wire protocol version.
pub const WIRE_VERSION: u16 = 1;

/// Upper bound for a single encoded frame (4 MiB).
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

#[derive(Serialize)]
struct FrameRef<'a, T> {
    version: u16,
    body: &'a T,
}

#[derive(Deserialize)]
struct Frame<T> {
    version: u16,
    body: T,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_FRAME_SIZE as u64)
}

/// Encode a value into a versioned frame.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    let frame = FrameRef {
        version: WIRE_VERSION,
        body: value,
    };
    options()
        .serialize(&frame)
        .map_err(|e| WireError::Encode(e.to_string()))
}

/// Decode a versioned frame, rejecting frames from other protocol versions.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(WireError::FrameTooLarge {
            size: bytes.len(),
            limit: MAX_FRAME_SIZE,
        });
    }

    // The version is the first field, so peek it before decoding the body
    // to report version skew instead of a generic decode failure.
    let version: u16 = options()
        .allow_trailing_bytes()
        .deserialize(bytes)
        .map_err(|e| WireError::Decode(e.to_string()))?;
    if version != WIRE_VERSION {
        return Err(WireError::UnsupportedVersion {
            received: version,
            supported: WIRE_VERSION,
        });
    }

    let frame: Frame<T> = options()
        .deserialize(bytes)
        .map_err(|e| WireError::Decode(e.to_string()))?;
    Ok(frame.body)
}
