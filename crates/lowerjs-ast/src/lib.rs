//! Tree representation shared by the lowerjs passes.
//!
//! Nodes live in an append-only [`NodeArena`] and are addressed by
//! [`NodeIndex`]. Passes never mutate a node: a rewrite appends a replacement
//! and returns its index, and an untouched subtree keeps its original index.

pub mod node;
pub use node::{Literal, Node, NodeData, NodeIndex, PropertyName, VarKind};

pub mod arena;
pub use arena::NodeArena;

pub mod transform;
pub use transform::{Transformer, for_each_child, walk_node};

pub mod printer;
pub use printer::print_node;
