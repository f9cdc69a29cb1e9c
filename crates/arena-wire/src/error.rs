//! Error types for the wire codec

use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, WireError>;

/// Wire codec error types
#[derive(Debug, Error)]
pub enum WireError {
    /// Stream ended before a field could be read in full
    #[error("truncated stream reading {field} at offset {offset}")]
    Truncated { field: &'static str, offset: u64 },

    /// Underlying stream failure other than end-of-stream
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),

    /// Leading bytes of a batch are not the expected magic
    #[error("packed message buffer has invalid header: {found:02x?}")]
    InvalidHeader { found: [u8; 4] },

    /// Nonzero tag byte outside the recognized set
    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    /// Decoded ordinal outside the enumeration's declared values
    #[error("enum value {value} out of range for {name}")]
    EnumOutOfRange { name: &'static str, value: u8 },

    /// Batch body held a different number of messages than the header declared
    #[error("unexpected number of messages in buffer: declared {declared}, decoded {decoded}")]
    CountMismatch { declared: u32, decoded: u32 },

    /// Batch declared a nonzero count but no messages could be decoded
    #[error("no messages in buffer (declared {declared})")]
    EmptyBatch { declared: u32 },

    /// String field bytes do not form valid UTF-8
    #[error("invalid utf-8 reading {field} at offset {offset}")]
    InvalidUtf8 { field: &'static str, offset: u64 },

    /// String exceeds the 1-byte length prefix
    #[error("string of {len} bytes exceeds the 255-byte wire limit")]
    StringTooLong { len: usize },

    /// List exceeds the 2-byte count prefix
    #[error("list of {len} elements exceeds the 65535-element wire limit")]
    ListTooLong { len: usize },
}
