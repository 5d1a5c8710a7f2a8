//! The tools module provides the helpers around the codec.
//!
//! The tools are:
//! - cli: Command line interface and the options it produces.
//! - file_io: Output naming and safe file writing for the file front end.
//! - freq_count: Byte frequency counting.
//! - report: Code table reports for files and text.
//!
pub mod cli;
pub mod file_io;
pub mod freq_count;
pub mod report;
