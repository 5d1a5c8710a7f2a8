//! Turns a HuffmanTree into the per-symbol bit codes used by the encoder.
//!
//! Each code is the path from the root to the symbol's leaf, 0 for a left step and 1 for a
//! right step. A tree that is a single leaf has no path, so its symbol gets the one bit
//! code `0`.

use std::fmt::{self, Display, Formatter};
use std::io::Write;

use log::trace;

use super::huffman::{HuffmanTree, NodeData, NodeId};
use crate::bitstream::bitwriter::BitWriter;
use crate::error::Result;

/// A code of up to 64 bits, right aligned in `bits`, first bit most significant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    /// This code with one more bit on the end.
    fn push(self, bit: bool) -> Self {
        debug_assert!(self.len < 64, "code longer than 64 bits");
        Self {
            bits: self.bits << 1 | bit as u64,
            len: self.len + 1,
        }
    }

    /// True if `self` is the first `self.len` bits of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", self.bits >> i & 1)?;
        }
        Ok(())
    }
}

/// Code and weight for every symbol present in a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
    weights: [u64; 256],
}

impl CodeTable {
    /// Walk the tree depth first and record the path to every leaf.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self {
            codes: [None; 256],
            weights: [0; 256],
        };
        let root = tree.root();
        match tree.node(root).node_data {
            NodeData::Leaf(symbol) => {
                table.codes[symbol as usize] = Some(Code { bits: 0, len: 1 });
                table.weights[symbol as usize] = tree.node(root).weight;
            }
            NodeData::Kids(..) => table.return_leaves(tree, root, Code::default()),
        }
        for (symbol, code) in table.iter() {
            trace!("{:>4}: {}", symbol, code);
        }
        table
    }

    /// Recursively walk the tree, storing each leaf's path as its code.
    fn return_leaves(&mut self, tree: &HuffmanTree, id: NodeId, code: Code) {
        let node = tree.node(id);
        match node.node_data {
            NodeData::Kids(left, right) => {
                self.return_leaves(tree, left, code.push(false));
                self.return_leaves(tree, right, code.push(true));
            }
            NodeData::Leaf(symbol) => {
                self.codes[symbol as usize] = Some(code);
                self.weights[symbol as usize] = node.weight;
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// (symbol, code) for every coded symbol, ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, code)| code.as_ref().map(|c| (s as u8, c)))
    }

    /// Payload size in bits: the sum of weight times code length.
    pub fn encoded_bits(&self) -> u64 {
        self.iter()
            .map(|(s, code)| self.weights[s as usize] * code.len as u64)
            .sum()
    }

    /// Put the code for `symbol` on the stream. Returns false if the symbol has no code.
    pub fn write_symbol<W: Write>(&self, symbol: u8, bw: &mut BitWriter<W>) -> Result<bool> {
        match self.codes[symbol as usize] {
            Some(code) => {
                bw.write_long(code.len, code.bits)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Display for CodeTable {
    /// One line per symbol: symbol, count, code length, code.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6} {:>12} {:>4}  code", "symbol", "count", "len")?;
        for (symbol, code) in self.iter() {
            let shown = if symbol.is_ascii_graphic() {
                format!("'{}'", symbol as char)
            } else {
                format!("{:#04x}", symbol)
            };
            writeln!(
                f,
                "{:>6} {:>12} {:>4}  {}",
                shown, self.weights[symbol as usize], code.len, code
            )?;
        }
        Ok(())
    }
}
