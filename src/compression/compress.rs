use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, Write};
use std::path::Path;

use log::{debug, info};

use crate::bitstream::bitwriter::BitWriter;
use crate::error::{HufError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::header::{header_bits, write_header};
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::cli::HufOpts;
use crate::tools::file_io::{compressed_name, OutputFile};
use crate::tools::freq_count::FrequencyTable;

/// Size of the read buffer for the encoding pass.
const READ_SIZE: usize = 1024 * 1024;

/// What an encode call produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub input_bytes: u64,
    pub header_bits: u64,
    pub payload_bits: u64,
    pub output_bytes: u64,
}

/// Encode everything in `input` onto `output`.
///
/// The input is read twice, once to count and once to encode, so it must be seekable. Both
/// passes start from the beginning of the input.
pub fn encode<R: Read + Seek, W: Write>(input: &mut R, output: &mut W) -> Result<EncodeStats> {
    // Pass one: count
    input.rewind()?;
    let table = FrequencyTable::count(input)?;
    if table.is_empty() {
        return Err(HufError::EmptyInput);
    }
    info!(
        "Counted {} bytes, {} distinct symbols.",
        table.total(),
        table.distinct()
    );

    let mut bw = BitWriter::new(output);
    write_header(&table, &mut bw)?;
    let header_bits = header_bits(&table)?;

    let tree = HuffmanTree::build(&table)?;
    let codes = CodeTable::from_tree(&tree);
    debug!(
        "Code lengths range from {} to {} bits.",
        codes.iter().map(|(_, c)| c.len).min().unwrap_or(0),
        codes.iter().map(|(_, c)| c.len).max().unwrap_or(0)
    );

    // Pass two: encode every byte
    input.rewind()?;
    let mut buf = vec![0_u8; READ_SIZE];
    let mut seen = 0_u64;
    loop {
        let size = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(size) => size,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..size] {
            if !codes.write_symbol(byte, &mut bw)? {
                return Err(changed_input());
            }
        }
        seen += size as u64;
    }
    if seen != table.total() {
        return Err(changed_input());
    }
    bw.flush()?;

    let payload_bits = bw.bits_written() - header_bits;
    let stats = EncodeStats {
        input_bytes: seen,
        header_bits,
        payload_bits,
        output_bytes: (bw.bits_written() + 7) / 8,
    };
    info!(
        "Encoded {} bytes into {} ({} header bits, {} payload bits).",
        stats.input_bytes, stats.output_bytes, stats.header_bits, stats.payload_bits
    );
    Ok(stats)
}

fn changed_input() -> HufError {
    io::Error::new(
        ErrorKind::InvalidData,
        "input changed between the counting and encoding passes",
    )
    .into()
}

/// Encode a byte slice into a new buffer.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode(&mut Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Compress one file, writing `<path>.<suffix>` or standard out.
pub fn compress_file(opts: &HufOpts, path: &Path) -> Result<EncodeStats> {
    let mut fin = File::open(path)?;
    let out_path = compressed_name(path, &opts.suffix);
    let mut out = OutputFile::create(opts, &out_path)?;

    match encode(&mut fin, &mut out) {
        Ok(stats) => {
            out.commit()?;
            info!(
                "{}: {} -> {} bytes.",
                path.display(),
                stats.input_bytes,
                stats.output_bytes
            );
            Ok(stats)
        }
        Err(e) => {
            out.discard();
            Err(e)
        }
    }
}

/// Compress standard input to standard output. Standard input cannot be rewound, so it is
/// read into memory first.
pub fn compress_stdin() -> Result<EncodeStats> {
    let mut data = Vec::new();
    io::stdin().lock().read_to_end(&mut data)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    encode(&mut Cursor::new(data), &mut out)
}

#[cfg(test)]
mod test {
    use super::{compress_file, encode, encode_bytes};
    use crate::error::HufError;
    use crate::tools::cli::HufOpts;
    use std::io::Cursor;

    #[test]
    fn small_encode_test() {
        let out = encode_bytes(b"AAAAABBBCD").unwrap();
        assert_eq!(out.len(), 71);
        assert_eq!(&out[64..68], &[5, 3, 1, 1]);
        // A=0 B=11 C=100 D=101: 00000 111111 100 101, zero padded
        assert_eq!(&out[68..], &[0b0000_0111, 0b1111_0010, 0b1000_0000]);
    }

    #[test]
    fn stats_test() {
        let mut out = Vec::new();
        let stats = encode(&mut Cursor::new(b"AAAAABBBCD"), &mut out).unwrap();
        assert_eq!(stats.input_bytes, 10);
        assert_eq!(stats.header_bits, 544);
        assert_eq!(stats.payload_bits, 17);
        assert_eq!(stats.output_bytes, out.len() as u64);
    }

    #[test]
    fn rewinds_input_test() {
        let mut input = Cursor::new(b"hello hello".to_vec());
        input.set_position(6);
        let mut out = Vec::new();
        let stats = encode(&mut input, &mut out).unwrap();
        assert_eq!(stats.input_bytes, 11);
    }

    #[test]
    fn empty_input_test() {
        let mut out = Vec::new();
        assert!(matches!(
            encode(&mut Cursor::new(b""), &mut out),
            Err(HufError::EmptyInput)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn single_symbol_test() {
        let out = encode_bytes(&[7_u8; 20]).unwrap();
        // Header: 512 class bits + 8 bit count, then 20 one bit codes
        assert_eq!(out.len(), 64 + 1 + 3);
        assert_eq!(out[64], 20);
        assert_eq!(&out[65..], &[0, 0, 0]);
    }

    #[test]
    fn compress_file_test() {
        let dir = std::env::temp_dir().join(format!("huffpack-compress-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("in.txt");
        std::fs::write(&path, b"AAAAABBBCD").unwrap();
        let _ = std::fs::remove_file(dir.join("in.txt.huf"));

        let stats = compress_file(&HufOpts::new(), &path).unwrap();
        assert_eq!(stats.output_bytes, 71);
        let written = std::fs::read(dir.join("in.txt.huf")).unwrap();
        assert_eq!(written, encode_bytes(b"AAAAABBBCD").unwrap());
    }

    #[test]
    fn compress_empty_file_test() {
        let dir = std::env::temp_dir().join(format!("huffpack-compress-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.txt");
        std::fs::write(&path, b"").unwrap();
        let _ = std::fs::remove_file(dir.join("empty.txt.huf"));

        assert!(matches!(
            compress_file(&HufOpts::new(), &path),
            Err(HufError::EmptyInput)
        ));
        assert!(!dir.join("empty.txt.huf").exists());
        assert!(!dir.join("empty.txt.huf.tmp").exists());
    }
}
