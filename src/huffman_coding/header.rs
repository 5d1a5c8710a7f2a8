//! The stream header: a self-describing copy of the frequency table.
//!
//! Layout, most significant bit first:
//! - 256 two bit size classes, one per symbol in ascending order.
//! - For every symbol whose class is not zero, again in ascending order, its count in
//!   8, 16 or 32 bits according to the class.
//!
//! All classes come first and all values after them. Both halves must be kept in this order
//! for existing files to stay readable.

use std::io::{Read, Write};

use log::{debug, trace};

use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{HufError, Result};
use crate::tools::freq_count::FrequencyTable;

/// Bits used to store each size class.
const CLASS_BITS: u8 = 2;

/// Width tag for one symbol's count in the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass {
    Absent = 0,
    Byte = 1,
    Short = 2,
    Word = 3,
}

impl SizeClass {
    /// Pick the smallest class that holds `count`. Counts of 2^32-1 and up cannot be stored.
    pub fn for_count(symbol: u8, count: u64) -> Result<Self> {
        match count {
            0 => Ok(SizeClass::Absent),
            1..=0xff => Ok(SizeClass::Byte),
            0x100..=0xffff => Ok(SizeClass::Short),
            c if c < u32::MAX as u64 => Ok(SizeClass::Word),
            _ => Err(HufError::FrequencyRange { symbol, count }),
        }
    }

    /// Decode a class tag read from the header.
    pub fn from_tag(symbol: usize, tag: u32) -> Result<Self> {
        match tag {
            0 => Ok(SizeClass::Absent),
            1 => Ok(SizeClass::Byte),
            2 => Ok(SizeClass::Short),
            3 => Ok(SizeClass::Word),
            class => Err(HufError::CorruptHeader { symbol, class }),
        }
    }

    /// Width of the stored count.
    pub fn value_bits(self) -> u8 {
        match self {
            SizeClass::Absent => 0,
            SizeClass::Byte => 8,
            SizeClass::Short => 16,
            SizeClass::Word => 32,
        }
    }
}

/// Work out every symbol's class, failing before anything is written if one is out of range.
fn classes(table: &FrequencyTable) -> Result<Vec<SizeClass>> {
    table
        .counts()
        .iter()
        .enumerate()
        .map(|(symbol, &count)| SizeClass::for_count(symbol as u8, count))
        .collect()
}

/// Exact size of the header for `table`, in bits.
pub fn header_bits(table: &FrequencyTable) -> Result<u64> {
    Ok(classes(table)?
        .iter()
        .map(|class| (CLASS_BITS + class.value_bits()) as u64)
        .sum())
}

/// Serialize the frequency table onto the bitstream.
pub fn write_header<W: Write>(table: &FrequencyTable, bw: &mut BitWriter<W>) -> Result<()> {
    let classes = classes(table)?;
    for class in &classes {
        bw.write_bits(CLASS_BITS, *class as u32)?;
    }
    trace!("Size classes written, now at {}.", bw.loc());

    for (class, &count) in classes.iter().zip(table.counts().iter()) {
        // Absent symbols have zero value bits, so nothing is written for them.
        bw.write_bits(class.value_bits(), count as u32)?;
    }
    debug!(
        "Header written: {} symbols present, {} bits.",
        table.distinct(),
        bw.bits_written()
    );
    Ok(())
}

/// Read a header back into a frequency table.
pub fn read_header<R: Read>(br: &mut BitReader<R>) -> Result<FrequencyTable> {
    let mut classes = Vec::with_capacity(256);
    for symbol in 0..256 {
        classes.push(SizeClass::from_tag(symbol, br.bits(CLASS_BITS)?)?);
    }
    trace!("Size classes read, now at {}.", br.loc());

    let mut counts = [0_u64; 256];
    for (count, class) in counts.iter_mut().zip(classes) {
        if class != SizeClass::Absent {
            *count = br.bits(class.value_bits())? as u64;
        }
    }
    let table = FrequencyTable::from_counts(counts);
    debug!(
        "Header read: {} symbols present, {} total.",
        table.distinct(),
        table.total()
    );
    Ok(table)
}
