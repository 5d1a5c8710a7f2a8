use std::io::{ErrorKind, Read};
use std::ops::Index;

use rayon::prelude::*;

use crate::error::Result;

/// Size of the read buffer used when counting from a stream.
const READ_SIZE: usize = 1024 * 1024;

/// Slices longer than this are counted in parallel.
const PARALLEL_MIN: usize = 64 * 1024;
const CHUNK: usize = 16 * 1024;

/// Occurrence counts for each of the 256 byte values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// An all zero table.
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Build a table directly from counts, as the header decoder does.
    pub fn from_counts(counts: [u64; 256]) -> Self {
        Self { counts }
    }

    /// Count every byte of a slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add(data);
        table
    }

    /// Count every byte a reader produces, until end of input. Read errors are returned as is.
    pub fn count<R: Read>(source: &mut R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = vec![0_u8; READ_SIZE];
        loop {
            let size = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(size) => size,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            table.add(&buf[..size]);
        }
        Ok(table)
    }

    /// Add the bytes of `data` to the running counts.
    pub fn add(&mut self, data: &[u8]) {
        let counts = Self::tally(data);
        self.counts
            .iter_mut()
            .zip(counts.iter())
            .for_each(|(total, n)| *total += n);
    }

    /// Count one slice. Slices over `PARALLEL_MIN` are split into `CHUNK` sized pieces and
    /// counted on the rayon pool.
    fn tally(data: &[u8]) -> [u64; 256] {
        if data.len() <= PARALLEL_MIN {
            return count_chunk([0; 256], data);
        }
        data.par_chunks(CHUNK)
            .fold(|| [0_u64; 256], count_chunk)
            .reduce(
                || [0_u64; 256],
                |mut left, right| {
                    left.iter_mut().zip(right.iter()).for_each(|(l, r)| *l += r);
                    left
                },
            )
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of distinct symbols present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&f| f > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&f| f == 0)
    }

    /// (symbol, count) for every present symbol, ascending by symbol.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &f)| f > 0)
            .map(|(s, &f)| (s as u8, f))
    }

    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u8> for FrequencyTable {
    type Output = u64;

    fn index(&self, symbol: u8) -> &u64 {
        &self.counts[symbol as usize]
    }
}

fn count_chunk(mut counts: [u64; 256], chunk: &[u8]) -> [u64; 256] {
    chunk.iter().for_each(|&b| counts[b as usize] += 1);
    counts
}
