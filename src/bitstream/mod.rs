//! The bitstream module forms the I/O subsystem for huffpack.
//!
//! Both halves work most significant bit first. The writer pads the final byte with zeros on
//! flush; the reader never invents bits past the end of its source, so a caller that asks
//! for more than was written gets a truncated stream error.
//!
pub mod bitreader;
pub mod bitwriter;
