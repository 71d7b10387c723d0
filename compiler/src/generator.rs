use sxt::block::{Block, BlockKind, CodeBlock};
use sxt::command::{Action, CommandRegistry};
use sxt::parser::Parser;
use sxt::template::TemplateRegistry;
use sxt::Script;

use crate::error::{CompileFailure, DiagnosticError};
use crate::event::Event;
use crate::resolver::{self, ResolvedCommand};

/// The output of a compile pass: the event list plus any warnings
/// collected along the way. Warnings never change the event stream.
#[derive(Debug)]
pub struct Compiled {
    pub events: Vec<Event>,
    pub warnings: Vec<DiagnosticError>,
}

/// Parse and compile a script in one step.
pub fn compile(
    source: &str,
    file_id: usize,
    commands: &CommandRegistry,
    templates: &TemplateRegistry,
) -> Result<Compiled, CompileFailure> {
    let parser = Parser::new(source.to_string(), file_id);
    let (script, parse_warnings) = parser.parse(templates).map_err(CompileFailure::Parse)?;

    let mut compiled = generate(&script, commands).map_err(CompileFailure::Compile)?;
    let mut warnings: Vec<DiagnosticError> =
        parse_warnings.into_iter().map(Into::into).collect();
    warnings.append(&mut compiled.warnings);
    compiled.warnings = warnings;
    Ok(compiled)
}

/// Walk a parsed script block by block, in order, and emit the event
/// stream. Events are appended exactly as encountered; adjacent
/// identical events are never merged, so block boundaries stay
/// observable in the output.
pub fn generate(script: &Script, commands: &CommandRegistry) -> Result<Compiled, DiagnosticError> {
    let mut events = Vec::new();
    let mut warnings = Vec::new();

    for block in &script.blocks {
        match &block.kind {
            BlockKind::Code(code) => emit_code(code, &mut events),
            BlockKind::Commands(cmds) => {
                for command in &cmds.commands {
                    let resolved =
                        resolver::resolve(block.tool, command, commands, script.source_id)?;
                    emit_action(&resolved, block, script.source_id, &mut events, &mut warnings);
                }
            }
        }
    }

    Ok(Compiled { events, warnings })
}

/// A code block types its lines top to bottom, one Enter between each
/// pair of adjacent lines and none after the last.
fn emit_code(code: &CodeBlock, events: &mut Vec<Event>) {
    for (index, line) in code.lines.iter().enumerate() {
        if index > 0 {
            events.push(Event::Newline(1));
        }
        if !line.is_empty() {
            events.push(Event::Literal(line.clone()));
        }
    }
}

fn emit_action(
    resolved: &ResolvedCommand,
    block: &Block,
    source_id: usize,
    events: &mut Vec<Event>,
    warnings: &mut Vec<DiagnosticError>,
) {
    // An explicit count of 0 means the command is a no-op.
    if resolved.count == 0 {
        return;
    }

    if resolved.action.repeatable() {
        let event = match &resolved.action {
            Action::Arrow(dir) => Event::Arrow(*dir, resolved.count),
            Action::Backspace => Event::Backspace(resolved.count),
            Action::Enter => Event::Newline(resolved.count),
            Action::Sleep => Event::Sleep(resolved.count),
            _ => unreachable!("repeatable() covers exactly these actions"),
        };
        events.push(event);
        return;
    }

    if resolved.count > 1 {
        warnings.push(DiagnosticError::warning(
            format!(
                "count {} ignored for '{}' in {} context; the command runs once",
                resolved.count,
                resolved.name,
                block.tool.name()
            ),
            resolved.span.clone(),
            source_id,
        ));
    }

    match &resolved.action {
        Action::Home => events.push(Event::Home),
        Action::End => events.push(Event::End),
        Action::CtrlHome => events.push(Event::CtrlHome),
        Action::CtrlEnd => events.push(Event::CtrlEnd),
        Action::PageUp => events.push(Event::PageUp),
        Action::PageDown => events.push(Event::PageDown),
        Action::ShiftPress => events.push(Event::ShiftPress),
        Action::ShiftRelease => events.push(Event::ShiftRelease),
        Action::Escape => events.push(Event::Escape),
        Action::ExitArrowMode => events.push(Event::ExitArrowMode),
        Action::Text(text) => emit_text(text, events),
        Action::Arrow(_) | Action::Backspace | Action::Enter | Action::Sleep => {
            unreachable!("repeatable actions are handled above")
        }
    }
}

/// Text expansions may embed newlines; split them into Literal and
/// Newline events the same way code blocks do.
fn emit_text(text: &str, events: &mut Vec<Event>) {
    for (index, segment) in text.split('\n').enumerate() {
        if index > 0 {
            events.push(Event::Newline(1));
        }
        if !segment.is_empty() {
            events.push(Event::Literal(segment.to_string()));
        }
    }
}
