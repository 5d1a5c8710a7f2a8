//! The huffman module holds the static Huffman model shared by the encoder and decoder.
//!
//! - header: writes and reads the frequency table at the front of every compressed stream.
//! - huffman: builds the prefix code tree from a frequency table.
//! - code_table: derives the bit code of every symbol from the tree.
//!
//! Nothing here carries state between calls. Both sides rebuild the tree from the same
//! frequency table, and the deterministic tie break guarantees they get the same one.
//!

pub mod code_table;
pub mod header;
pub mod huffman;
