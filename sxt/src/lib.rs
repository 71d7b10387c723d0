pub mod block;
pub mod command;
pub mod parser;
pub mod template;
pub mod tool;

use crate::block::Block;

/// A parsed structured typing script.
#[derive(Debug, Clone)]
pub struct Script {
    /// Blocks in source order.
    pub blocks: Vec<Block>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}
