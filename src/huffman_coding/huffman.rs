use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;

use crate::error::{HufError, Result};
use crate::tools::freq_count::FrequencyTable;

/// Arena index of a node in a HuffmanTree.
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeData {
    /// Left child (bit 0), right child (bit 1).
    Kids(NodeId, NodeId),
    Leaf(u8),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: u64, node_data: NodeData) -> Node {
        Node { weight, node_data }
    }
}

/// A prefix code tree held in an arena. Leaves come first, in ascending symbol order, and
/// each merged node is appended after its children, so a node's index is also the order in
/// which it entered the merge queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for a frequency table with the greedy two-smallest merge.
    ///
    /// Ties on weight go to the node that entered the queue first. The encoder and decoder
    /// both rebuild the tree from the header, so this ordering must never change.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let mut nodes: Vec<Node> = table
            .present()
            .map(|(symbol, weight)| Node::new(weight, NodeData::Leaf(symbol)))
            .collect();
        if nodes.is_empty() {
            return Err(HufError::EmptyInput);
        }

        let mut queue: BinaryHeap<Reverse<(u64, NodeId)>> = nodes
            .iter()
            .enumerate()
            .map(|(id, node)| Reverse((node.weight, id)))
            .collect();

        let mut root = 0;
        while let Some(Reverse((left_weight, left))) = queue.pop() {
            match queue.pop() {
                // Last node standing
                None => {
                    root = left;
                    break;
                }
                Some(Reverse((right_weight, right))) => {
                    let weight = left_weight + right_weight;
                    let id = nodes.len();
                    nodes.push(Node::new(weight, NodeData::Kids(left, right)));
                    queue.push(Reverse((weight, id)));
                }
            }
        }

        let tree = Self { nodes, root };
        debug!(
            "Built tree with {} nodes for {} symbols, depth {}.",
            tree.nodes.len(),
            table.distinct(),
            tree.depth()
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Leaves plus internal nodes, `2 * distinct - 1`. Never zero, since `build` refuses an
    /// empty table.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The symbol at `id` if it is a leaf.
    pub fn symbol(&self, id: NodeId) -> Option<u8> {
        match self.nodes[id].node_data {
            NodeData::Leaf(symbol) => Some(symbol),
            NodeData::Kids(..) => None,
        }
    }

    /// Follow one edge down from `id`: false goes left, true goes right. A leaf stays put.
    #[inline(always)]
    pub fn step(&self, id: NodeId, bit: bool) -> NodeId {
        match self.nodes[id].node_data {
            NodeData::Kids(left, right) => {
                if bit {
                    right
                } else {
                    left
                }
            }
            NodeData::Leaf(_) => id,
        }
    }

    /// Longest root to leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id].node_data {
                NodeData::Kids(left, right) => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                NodeData::Leaf(_) => deepest = deepest.max(depth),
            }
        }
        deepest
    }
}
