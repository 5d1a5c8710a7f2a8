//! The compression module runs the two codec pipelines.
//!
//! Compression:
//! - Count how often each byte value occurs in the whole input.
//! - Write those counts as the stream header.
//! - Build the Huffman tree and code table from the counts.
//! - Read the input again from the start and write each byte's code.
//! - Pad the last byte with zero bits.
//!
//! Decompression reads the header, rebuilds the same tree, and walks it one bit at a time,
//! writing a byte at every leaf until the header's total has been produced.
//!
//! Both run start to finish on the calling thread. Each call owns its own table, tree and
//! codes, and drops them when it returns.
//!

pub mod compress;
pub mod decompress;
