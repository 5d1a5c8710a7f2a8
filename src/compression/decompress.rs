use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use log::{info, trace};

use crate::bitstream::bitreader::BitReader;
use crate::error::Result;
use crate::huffman_coding::header::read_header;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::cli::HufOpts;
use crate::tools::file_io::{decompressed_name, OutputFile};

/// Decoded bytes held before they are written to the sink.
const OUT_BUFFER: usize = 64 * 1024;

/// What a decode call produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Compressed bytes consumed, including the padded last byte.
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Decode a compressed stream from `input` onto `output`.
///
/// The header says exactly how many symbols follow, so decoding stops as soon as that many
/// have been written and the padding bits are never looked at.
pub fn decode<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<DecodeStats> {
    let mut br = BitReader::new(input)?;
    let table = read_header(&mut br)?;
    let total = table.total();
    info!(
        "Header lists {} symbols, {} distinct.",
        total,
        table.distinct()
    );
    if total == 0 {
        output.flush()?;
        return Ok(DecodeStats {
            input_bytes: (br.bits_read() + 7) / 8,
            output_bytes: 0,
        });
    }

    let tree = HuffmanTree::build(&table)?;
    let root = tree.root();
    let mut buf: Vec<u8> = Vec::with_capacity(OUT_BUFFER);
    let mut emitted = 0_u64;

    if let Some(symbol) = tree.symbol(root) {
        // A lone symbol has the one bit code 0; each occurrence still uses its bit.
        trace!("Single symbol stream of {:#04x}.", symbol);
        while emitted < total {
            br.bit()?;
            buf.push(symbol);
            emitted += 1;
            if buf.len() == OUT_BUFFER {
                output.write_all(&buf)?;
                buf.clear();
            }
        }
    } else {
        let mut node = root;
        while emitted < total {
            node = tree.step(node, br.bit()?);
            if let Some(symbol) = tree.symbol(node) {
                buf.push(symbol);
                emitted += 1;
                node = root;
                if buf.len() == OUT_BUFFER {
                    output.write_all(&buf)?;
                    buf.clear();
                }
            }
        }
    }
    output.write_all(&buf)?;
    output.flush()?;

    let stats = DecodeStats {
        input_bytes: (br.bits_read() + 7) / 8,
        output_bytes: emitted,
    };
    info!(
        "Decoded {} bytes from {} compressed bytes.",
        stats.output_bytes, stats.input_bytes
    );
    Ok(stats)
}

/// Decode a compressed buffer into a new buffer.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode(&mut &data[..], &mut out)?;
    Ok(out)
}

/// Decompress one file, writing it without its last extension or to standard out.
pub fn decompress_file(opts: &HufOpts, path: &Path) -> Result<DecodeStats> {
    let mut fin = File::open(path)?;
    let out_path = decompressed_name(path);
    let mut out = OutputFile::create(opts, &out_path)?;

    match decode(&mut fin, &mut out) {
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

/// Decode a file without keeping the output, to check that it is intact.
pub fn test_file(path: &Path) -> Result<DecodeStats> {
    let mut fin = File::open(path)?;
    let stats = decode(&mut fin, &mut io::sink())?;
    info!("{}: ok, {} bytes.", path.display(), stats.output_bytes);
    Ok(stats)
}

/// Decompress standard input to standard output.
pub fn decompress_stdin() -> Result<DecodeStats> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();
    decode(&mut input, &mut out)
}

#[cfg(test)]
mod test {
    use super::{decode, decode_bytes, decompress_file, test_file};
    use crate::compression::compress::{compress_file, encode_bytes};
    use crate::error::HufError;
    use crate::huffman_coding::code_table::CodeTable;
    use crate::huffman_coding::header::header_bits;
    use crate::huffman_coding::huffman::HuffmanTree;
    use crate::tools::cli::HufOpts;
    use crate::tools::freq_count::FrequencyTable;

    fn round_trip(data: &[u8]) {
        let packed = encode_bytes(data).unwrap();
        assert_eq!(decode_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn small_round_trip_test() {
        let packed = encode_bytes(b"AAAAABBBCD").unwrap();
        let mut out = Vec::new();
        let stats = decode(&mut packed.as_slice(), &mut out).unwrap();
        assert_eq!(out, b"AAAAABBBCD");
        assert_eq!(stats.output_bytes, 10);
        assert_eq!(stats.input_bytes, 71);
    }

    #[test]
    fn single_symbol_test() {
        round_trip(b"x");
        round_trip(&[0_u8; 1000]);
        round_trip(&[255_u8; 100_000]);
    }

    #[test]
    fn all_symbols_test() {
        let all: Vec<u8> = (0..=255).collect();
        round_trip(&all);
        let packed = encode_bytes(&all).unwrap();
        // 512 class bits, 256 byte counts, then 256 eight bit codes
        assert_eq!(packed.len(), 64 + 256 + 256);
    }

    #[test]
    fn text_round_trip_test() {
        let text = "It was the best of times, it was the worst of times, it was the age of \
                    wisdom, it was the age of foolishness...\n"
            .repeat(50);
        round_trip(text.as_bytes());
    }

    #[test]
    fn wide_counts_test() {
        // Counts needing 16 and 32 bit header fields
        let mut data = vec![b'a'; 70_000];
        data.extend(vec![b'b'; 300]);
        data.extend(vec![b'c'; 2]);
        data.extend((0..=255).collect::<Vec<u8>>());
        round_trip(&data);
    }

    #[test]
    fn pseudo_random_test() {
        let mut state = 0x2545_f491_u32;
        let data: Vec<u8> = (0..200_000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                // Skew toward low values
                (state % 256) as u8 & (state >> 8) as u8
            })
            .collect();
        round_trip(&data);
    }

    #[test]
    fn payload_size_test() {
        let data = b"AAAAABBBCD";
        let table = FrequencyTable::from_bytes(data);
        let codes = CodeTable::from_tree(&HuffmanTree::build(&table).unwrap());
        let bits = header_bits(&table).unwrap() + codes.encoded_bits();
        assert_eq!(encode_bytes(data).unwrap().len() as u64, (bits + 7) / 8);
    }

    #[test]
    fn skewed_compresses_test() {
        let mut data = vec![b'e'; 50_000];
        data.extend(vec![b't'; 20_000]);
        data.extend(vec![b'q'; 100]);
        let packed = encode_bytes(&data).unwrap();
        let table = FrequencyTable::from_bytes(&data);
        // Never beyond the largest header plus the optimal payload
        let codes = CodeTable::from_tree(&HuffmanTree::build(&table).unwrap());
        let bound = 256 * 34 + 1 + codes.encoded_bits();
        assert!((packed.len() as u64) * 8 <= bound + 7);
        assert!(packed.len() < data.len() / 4);
    }

    #[test]
    fn truncated_payload_test() {
        let packed = encode_bytes(b"AAAAABBBCD").unwrap();
        // 560 of the 561 needed bits
        assert!(matches!(
            decode_bytes(&packed[..70]),
            Err(HufError::TruncatedStream { bits_read: 560 })
        ));
        assert!(matches!(
            decode_bytes(&packed[..68]),
            Err(HufError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn truncated_single_symbol_test() {
        let packed = encode_bytes(&[9_u8; 40]).unwrap();
        assert!(matches!(
            decode_bytes(&packed[..packed.len() - 1]),
            Err(HufError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn empty_stream_test() {
        assert!(matches!(
            decode_bytes(&[]),
            Err(HufError::TruncatedStream { bits_read: 0 })
        ));
    }

    #[test]
    fn zero_symbol_header_test() {
        // All classes absent: nothing to decode, trailing bytes are left unread
        let mut data = vec![0_u8; 64];
        data.push(0xff);
        let mut out = Vec::new();
        let stats = decode(&mut data.as_slice(), &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.input_bytes, 64);
    }

    #[test]
    fn file_round_trip_test() {
        let dir = std::env::temp_dir().join(format!("huffpack-decompress-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("story.txt");
        let text = "the quick brown fox jumps over the lazy dog\n".repeat(100);
        std::fs::write(&path, &text).unwrap();
        let _ = std::fs::remove_file(dir.join("story.txt.huf"));

        compress_file(&HufOpts::new(), &path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let packed = dir.join("story.txt.huf");
        assert_eq!(test_file(&packed).unwrap().output_bytes, text.len() as u64);

        decompress_file(&HufOpts::new(), &packed).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn file_truncated_test() {
        let dir = std::env::temp_dir().join(format!("huffpack-decompress-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let packed = dir.join("cut.bin.huf");
        let full = encode_bytes(b"AAAAABBBCD").unwrap();
        std::fs::write(&packed, &full[..69]).unwrap();
        let _ = std::fs::remove_file(dir.join("cut.bin"));

        assert!(matches!(
            decompress_file(&HufOpts::new(), &packed),
            Err(HufError::TruncatedStream { .. })
        ));
        assert!(!dir.join("cut.bin").exists());
        assert!(test_file(&packed).is_err());
    }
}
