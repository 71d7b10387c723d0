use std::ops::Range;

use crate::block::{Block, BlockKind, CodeBlock, CommandBlock};
use crate::parser::error::ParseError;
use crate::parser::expand;
use crate::template::TemplateRegistry;
use crate::tool::ToolContext;

/// Comment marker for lines inside command blocks.
const COMMENT_MARKER: char = '#';

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split raw script text into an ordered list of blocks. All errors
/// found in the pass are returned together; warnings accompany a
/// successful result.
pub fn parse_blocks(
    source: &str,
    file_id: usize,
    templates: &TemplateRegistry,
) -> Result<(Vec<Block>, Vec<ParseError>), Vec<ParseError>> {
    let mut state = ParseState::new(file_id, templates);

    for line in lines(source) {
        state.process_line(line);
    }

    state.finalize(source.len())
}

// ---------------------------------------------------------------------------
// Line model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Line<'a> {
    text: &'a str,
    span: Range<usize>,
}

/// Iterate source lines with their byte spans, stripping the line
/// terminator from the text but keeping it out of the span too.
fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    source.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);
        Line {
            text,
            span: start..start + text.len(),
        }
    })
}

// ---------------------------------------------------------------------------
// Tag grammar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Code,
    Commands,
}

impl TagKind {
    fn name(self) -> &'static str {
        match self {
            TagKind::Code => "CODE",
            TagKind::Commands => "COMMANDS",
        }
    }
}

struct Tag<'a> {
    kind: TagKind,
    closing: bool,
    tool: Option<&'a str>,
}

/// Recognize a block tag occupying a whole line: `<CODE>`,
/// `<COMMANDS: VIM>`, `</CODE>`, ... Tag keywords are matched
/// case-insensitively. Anything else — including short-command tokens
/// like `<u5>` — is not a tag.
fn parse_tag(line: &str) -> Option<Tag<'_>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('<')?.strip_suffix('>')?;
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    let (word, tool) = match inner.split_once(':') {
        Some((word, tool)) => (word.trim(), Some(tool.trim())),
        None => (inner.trim(), None),
    };

    let kind = if word.eq_ignore_ascii_case("CODE") {
        TagKind::Code
    } else if word.eq_ignore_ascii_case("COMMANDS") {
        TagKind::Commands
    } else {
        return None;
    };

    Some(Tag {
        kind,
        closing,
        tool: tool.filter(|t| !t.is_empty()),
    })
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState<'a> {
    file_id: usize,
    templates: &'a TemplateRegistry,
    blocks: Vec<Block>,
    warnings: Vec<ParseError>,
    errors: Vec<ParseError>,
    /// Lines accumulated outside any tagged block.
    loose: Vec<Line<'a>>,
    open: Option<OpenBlock<'a>>,
}

struct OpenBlock<'a> {
    kind: TagKind,
    tool: ToolContext,
    open_span: Range<usize>,
    content: Vec<Line<'a>>,
}

impl<'a> ParseState<'a> {
    fn new(file_id: usize, templates: &'a TemplateRegistry) -> Self {
        ParseState {
            file_id,
            templates,
            blocks: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            loose: Vec::new(),
            open: None,
        }
    }

    fn process_line(&mut self, line: Line<'a>) {
        let Some(tag) = parse_tag(line.text) else {
            match &mut self.open {
                Some(open) => open.content.push(line),
                None => self.loose.push(line),
            }
            return;
        };

        if tag.closing {
            self.close_block(tag, line);
        } else {
            self.open_block(tag, line);
        }
    }

    fn open_block(&mut self, tag: Tag<'a>, line: Line<'a>) {
        // An open tag while a block is still open: report it, then
        // recover by finishing the dangling block so scanning goes on.
        if let Some(open) = self.open.take() {
            self.errors.push(
                ParseError::error(
                    format!("<{}> block was never closed", open.kind.name()),
                    open.open_span.clone(),
                    self.file_id,
                )
                .with_note("a new block opens before this one is closed"),
            );
            self.finish_block(open, line.span.start);
        }

        self.flush_loose();

        let tool = match tag.tool {
            None => ToolContext::Generic,
            Some(name) => match ToolContext::from_name(name) {
                Some(tool) => tool,
                None => {
                    self.warnings.push(ParseError::warning(
                        format!("unknown tool context '{name}', treating block as generic"),
                        line.span.clone(),
                        self.file_id,
                    ));
                    ToolContext::Generic
                }
            },
        };

        self.open = Some(OpenBlock {
            kind: tag.kind,
            tool,
            open_span: line.span,
            content: Vec::new(),
        });
    }

    fn close_block(&mut self, tag: Tag<'a>, line: Line<'a>) {
        match self.open.take() {
            None => {
                self.errors.push(ParseError::error(
                    format!("</{}> without a matching open tag", tag.kind.name()),
                    line.span,
                    self.file_id,
                ));
            }
            Some(open) if open.kind != tag.kind => {
                self.errors.push(
                    ParseError::error(
                        format!(
                            "<{}> block closed by </{}>",
                            open.kind.name(),
                            tag.kind.name()
                        ),
                        line.span.clone(),
                        self.file_id,
                    )
                    .with_note(format!("block opened as <{}> here", open.kind.name())),
                );
                self.finish_block(open, line.span.end);
            }
            Some(open) => self.finish_block(open, line.span.end),
        }
    }

    /// Turn a closed block's content lines into a Block. Empty blocks
    /// are preserved; scripts may rely on their ordering.
    fn finish_block(&mut self, open: OpenBlock<'a>, span_end: usize) {
        let span = open.open_span.start..span_end;
        let kind = match open.kind {
            TagKind::Code => {
                let dedented = dedent(&open.content);
                let mut expanded = Vec::new();
                for line in &dedented {
                    let text = expand::expand_macros(line, open.tool, self.templates);
                    expanded.extend(text.split('\n').map(str::to_string));
                }
                BlockKind::Code(CodeBlock { lines: expanded })
            }
            TagKind::Commands => {
                let mut commands = Vec::new();
                for line in &open.content {
                    let trimmed = line.text.trim();
                    if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                        continue;
                    }
                    commands.extend(expand::expand_commands(
                        trimmed,
                        line.span.clone(),
                        self.file_id,
                        &mut self.warnings,
                    ));
                }
                BlockKind::Commands(CommandBlock { commands })
            }
        };

        self.blocks.push(Block {
            tool: open.tool,
            kind,
            span,
        });
    }

    /// Text outside any tagged block is content to type: trim the
    /// surrounding blank lines and keep the rest verbatim, no dedent,
    /// as an implicit generic code block.
    fn flush_loose(&mut self) {
        let lines = std::mem::take(&mut self.loose);
        let first = lines.iter().position(|l| !l.text.trim().is_empty());
        let Some(first) = first else {
            return;
        };
        let last = lines.iter().rposition(|l| !l.text.trim().is_empty()).unwrap();

        let kept = &lines[first..=last];
        let span = kept[0].span.start..kept[kept.len() - 1].span.end;
        self.blocks.push(Block {
            tool: ToolContext::Generic,
            kind: BlockKind::Code(CodeBlock {
                lines: kept.iter().map(|l| l.text.to_string()).collect(),
            }),
            span,
        });
    }

    fn finalize(mut self, source_len: usize) -> Result<(Vec<Block>, Vec<ParseError>), Vec<ParseError>> {
        if let Some(open) = self.open.take() {
            self.errors.push(
                ParseError::error(
                    format!("<{}> block was never closed", open.kind.name()),
                    open.open_span.clone(),
                    self.file_id,
                )
                .with_note("the block is still open at the end of the script"),
            );
            self.finish_block(open, source_len);
        }

        self.flush_loose();

        if self.errors.is_empty() {
            Ok((self.blocks, self.warnings))
        } else {
            Err(self.errors)
        }
    }
}

// ---------------------------------------------------------------------------
// Dedent
// ---------------------------------------------------------------------------

/// Remove the longest whitespace prefix shared by every non-blank
/// line. Blank lines do not participate and dedent to empty, so the
/// operation is idempotent and preserves relative indentation.
fn dedent(lines: &[Line<'_>]) -> Vec<String> {
    let prefix = common_indent(lines);
    lines
        .iter()
        .map(|line| {
            if line.text.trim().is_empty() {
                String::new()
            } else {
                line.text[prefix.len()..].to_string()
            }
        })
        .collect()
}

fn common_indent(lines: &[Line<'_>]) -> String {
    let mut common: Option<&str> = None;
    for line in lines {
        if line.text.trim().is_empty() {
            continue;
        }
        let indent = leading_whitespace(line.text);
        common = Some(match common {
            None => indent,
            Some(current) => shared_prefix(current, indent),
        });
    }
    common.unwrap_or("").to_string()
}

fn leading_whitespace(text: &str) -> &str {
    &text[..text.len() - text.trim_start().len()]
}

fn shared_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let mut end = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        end += ca.len_utf8();
    }
    &a[..end]
}
