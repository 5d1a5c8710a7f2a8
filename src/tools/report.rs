use std::fs::File;
use std::path::Path;

use crate::compression::compress::encode_bytes;
use crate::error::{HufError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::header::header_bits;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::freq_count::FrequencyTable;

/// Build the code table for a set of counts.
fn code_table(table: &FrequencyTable) -> Result<CodeTable> {
    Ok(CodeTable::from_tree(&HuffmanTree::build(table)?))
}

/// Code table report for a file, without compressing it.
pub fn file_codes(path: &Path) -> Result<String> {
    let table = FrequencyTable::count(&mut File::open(path)?)?;
    let codes = code_table(&table)?;
    Ok(format!(
        "{}: {} bytes, {} symbols, {} payload bits, {} header bits\n{}",
        path.display(),
        table.total(),
        table.distinct(),
        codes.encoded_bits(),
        header_bits(&table)?,
        codes
    ))
}

/// Code table report for a piece of text, with the size it would compress to.
pub fn text_codes(text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(HufError::EmptyInput);
    }
    let table = FrequencyTable::from_bytes(text.as_bytes());
    let codes = code_table(&table)?;
    let packed = encode_bytes(text.as_bytes())?;
    Ok(format!(
        "{} bytes of text, {} payload bits, {} bytes compressed\n{}",
        text.len(),
        codes.encoded_bits(),
        packed.len(),
        codes
    ))
}
