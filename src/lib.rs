//! Static Huffman compression of byte streams.
//!
//! Version 0.1.0
//!
//! A compressed stream carries its own model: a header with the count of every byte value,
//! followed by the Huffman coded bytes and zero padding to the next byte boundary. There is
//! no magic number or checksum. A damaged stream shows up only as running out of bits
//! before the header's byte count has been produced.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffpack test.txt`
//!
//! This will compress the file and create the file test.txt.huf. `huffpack -d test.txt.huf`
//! restores test.txt.
//!
//! The same pipelines are available on any reader and writer:
//!
//! ```
//! let packed = huffpack::encode_bytes(b"AAAAABBBCD").unwrap();
//! assert_eq!(huffpack::decode_bytes(&packed).unwrap(), b"AAAAABBBCD");
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{encode, encode_bytes, EncodeStats};
pub use compression::decompress::{decode, decode_bytes, DecodeStats};
pub use error::{HufError, Result};
pub use tools::freq_count::FrequencyTable;
