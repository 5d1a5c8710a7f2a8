//! Error classification for the huffpack codec.
//!
//! Every failure aborts the current encode or decode call. Nothing is retried.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HufError {
    /// Read/write failure on the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encode was called on zero input bytes.
    #[error("Input is empty, nothing to encode")]
    EmptyInput,

    /// A symbol count does not fit in the header's largest size class.
    #[error("Symbol {symbol:#04x} occurs {count} times, more than the header can store")]
    FrequencyRange { symbol: u8, count: u64 },

    /// The encoded stream ended before the header's symbol count was reached.
    #[error("Compressed stream ended early after {bits_read} bits")]
    TruncatedStream { bits_read: u64 },

    /// A header size class outside 0..=3.
    #[error("Invalid size class {class} for symbol {symbol} in header")]
    CorruptHeader { symbol: usize, class: u32 },
}

pub type Result<T> = std::result::Result<T, HufError>;
