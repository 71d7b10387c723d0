use std::ops::Range;

use sxt::command::{Action, CommandRef, CommandRegistry};
use sxt::tool::ToolContext;

use crate::error::{CompileError, DiagnosticError};

/// A command name bound to its action, with the repeat count defaulted
/// and the source location carried through for diagnostics.
#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    pub action: Action,
    pub count: u32,
    pub name: String,
    pub span: Range<usize>,
}

/// Bind a command reference against the registry under the block's
/// tool context. Resolution is pure lookup; an unknown name is a hard
/// error naming both the command and the context it failed in.
pub fn resolve(
    tool: ToolContext,
    command: &CommandRef,
    registry: &CommandRegistry,
    source_id: usize,
) -> Result<ResolvedCommand, DiagnosticError> {
    let action = registry.lookup(tool, &command.name).ok_or_else(|| DiagnosticError {
        error: CompileError::UnresolvedCommand {
            name: command.name.clone(),
            tool: tool.name().to_string(),
        },
        span: Some(command.span.clone()),
        source_id,
        is_warning: false,
    })?;

    Ok(ResolvedCommand {
        action: action.clone(),
        count: command.count.unwrap_or(1),
        name: command.name.clone(),
        span: command.span.clone(),
    })
}
