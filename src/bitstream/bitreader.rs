//! BitReader: reads a packed bitstream, most significant bit first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call. Reading
//! past the end of the source is an error; no bits are ever synthesized.
//!

use std::io::{ErrorKind, Read};

use crate::error::{HufError, Result};

const BUFFER_SIZE: usize = 64 * 1024;

/// Reads a packed bitstream from any byte source.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    bits_read: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader and pre-reads the first buffer of data.
    pub fn new(source: R) -> Result<Self> {
        let mut br = Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            cursor: 0,
            bit_index: 0,
            bits_read: 0,
            source,
        };
        br.have_data()?;
        Ok(br)
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> Result<bool> {
        // Only try to read more data when the buffer length is equal to the buffer cursor location
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            // Adjust the buffer if we read less than the buffer size
            self.buffer.truncate(size);
            // Reset the cursor and bit index
            self.cursor = 0;
            self.bit_index = 0;
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return the next bit, *true* for 1 and *false* for 0.
    pub fn bit(&mut self) -> Result<bool> {
        if !self.have_data()? {
            return Err(HufError::TruncatedStream {
                bits_read: self.bits_read,
            });
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        self.bits_read += 1;
        Ok(bit == 1)
    }

    /// Return the next n bits (n <= 32) as an unsigned value, first bit most significant.
    pub fn bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32, "bits called with {} bits", n);
        let mut result = 0_u64;
        for _ in 0..n {
            result = result << 1 | self.bit()? as u64;
        }
        Ok(result as u32)
    }

    /// Total bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Debugging function. Report current position in the stream.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits_read / 8, self.bits_read % 8)
    }
}
