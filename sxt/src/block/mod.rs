use std::ops::Range;

use crate::command::CommandRef;
use crate::tool::ToolContext;

/// A tagged section of script source: literal text to type, or
/// control actions to perform.
#[derive(Debug, Clone)]
pub struct Block {
    /// The tool context named on the open tag (`Generic` when absent
    /// or unrecognized).
    pub tool: ToolContext,
    pub kind: BlockKind,
    /// Byte span from open tag through close tag, for error reporting.
    pub span: Range<usize>,
}

#[derive(Debug, Clone)]
pub enum BlockKind {
    Code(CodeBlock),
    Commands(CommandBlock),
}

/// Literal text to type. Lines are stored dedented and macro-expanded;
/// the line break after the last line is not part of the block, so a
/// block types no trailing newline unless the author asks for one.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub lines: Vec<String>,
}

/// Control actions in source order. Comment and blank lines are gone
/// by the time a block reaches this form.
#[derive(Debug, Clone)]
pub struct CommandBlock {
    pub commands: Vec<CommandRef>,
}
