use std::io::{self, Write};

use log::error;

/// Number of packed bytes held before they are handed to the underlying writer.
const BUFFER_SIZE: usize = 64 * 1024;

/// Writes a bitstream for output, most significant bit first. Bits are queued and moved
/// into the output buffer a byte at a time; the buffer is written to the sink when full
/// and on flush().
pub struct BitWriter<W: Write> {
    /// Output buffer of completed bytes waiting to be written.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total bits accepted so far, not counting padding.
    bits_written: u64,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter over any sink. Call flush() once at the end of the session
    /// or the last partial byte will be lost.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            bits_written: 0,
            writer,
        }
    }

    /// Move all full bytes from the queue to the output buffer, writing the buffer out
    /// when it fills.
    fn push_queue(&mut self) -> io::Result<()> {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
        if self.output.len() >= BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Writes the low `n` bits of `value` (n <= 32), most significant of those bits first.
    pub fn write_bits(&mut self, n: u8, value: u32) -> io::Result<()> {
        debug_assert!(n <= 32, "write_bits called with {} bits", n);
        if n == 0 {
            return Ok(());
        }
        let mask = (1_u64 << n) - 1;
        self.queue <<= n; //shift queue by bit length
        self.queue |= value as u64 & mask; //add data portion to queue
        self.q_bits += n; //update depth of queue bits
        self.bits_written += n as u64;
        self.push_queue()
    }

    /// Writes the low `n` bits of a 64 bit value (n <= 64), in two pieces when needed.
    pub fn write_long(&mut self, n: u8, value: u64) -> io::Result<()> {
        debug_assert!(n <= 64, "write_long called with {} bits", n);
        if n > 32 {
            self.write_bits(n - 32, (value >> 32) as u32)?;
            self.write_bits(32, value as u32)
        } else {
            self.write_bits(n, value as u32)
        }
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.write_bits(1, bit as u32)
    }

    /// Total bits written so far, excluding any flush padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits, then writes everything buffered to the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
        }
        self.push_queue()?;
        if self.q_bits > 0 {
            error!("Stuff left in the BitWriter queue.");
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()
    }

    /// Give back the sink. Anything not flushed is dropped.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits_written / 8, self.bits_written % 8)
    }
}
