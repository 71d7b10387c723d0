use std::ops::Range;

use crate::command::CommandRef;
use crate::parser::error::ParseError;
use crate::template::TemplateRegistry;
use crate::tool::ToolContext;

/// Letter table for short-command tokens. Case is significant here,
/// unlike command-name lookup everywhere else.
fn long_name(letter: char) -> Option<&'static str> {
    Some(match letter {
        'u' => "ARROW_UP",
        'd' => "ARROW_DOWN",
        'l' => "ARROW_LEFT",
        'r' => "ARROW_RIGHT",
        'e' => "ENTER",
        'b' => "BACKSPACE",
        's' => "SLEEP",
        'h' => "HOME",
        'E' => "END",
        'U' => "PAGE_UP",
        'D' => "PAGE_DOWN",
        _ => return None,
    })
}

/// Expand one command-block line into command references, rewriting
/// short tokens (`<u5>` → `ARROW_UP 5`) in place. Text between tokens
/// is parsed as its own long-form command. Tokens with an unknown
/// letter, and the empty `<>` pair, are kept verbatim so the resolver
/// reports them explicitly instead of them vanishing here.
pub fn expand_commands(
    line: &str,
    span: Range<usize>,
    file_id: usize,
    warnings: &mut Vec<ParseError>,
) -> Vec<CommandRef> {
    let mut refs = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find('<') {
        let close = match rest[open..].find('>') {
            Some(offset) => open + offset,
            // Unterminated bracket; everything left is plain text.
            None => break,
        };

        push_plain(&rest[..open], &span, file_id, warnings, &mut refs);

        let token = &rest[open..=close];
        let inner = rest[open + 1..close].trim();
        match expand_token(inner, token, &span, file_id, warnings) {
            Some(command) => refs.push(command),
            None => push_plain(token, &span, file_id, warnings, &mut refs),
        }
        rest = &rest[close + 1..];
    }

    push_plain(rest, &span, file_id, warnings, &mut refs);
    refs
}

/// Rewrite the inside of a bracket token, or `None` to keep the token
/// verbatim.
fn expand_token(
    inner: &str,
    token: &str,
    span: &Range<usize>,
    file_id: usize,
    warnings: &mut Vec<ParseError>,
) -> Option<CommandRef> {
    let mut chars = inner.chars();
    let letter = chars.next()?;
    let name = long_name(letter)?;
    let suffix = chars.as_str().trim();

    let count = if suffix.is_empty() {
        1
    } else {
        match suffix.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                warnings.push(ParseError::warning(
                    format!("malformed count in short command '{token}', defaulting to 1"),
                    span.clone(),
                    file_id,
                ));
                1
            }
        }
    };

    Some(CommandRef {
        name: name.to_string(),
        count: Some(count),
        span: span.clone(),
    })
}

/// Parse a plain text segment of a command line as `NAME [count]`.
fn push_plain(
    text: &str,
    span: &Range<usize>,
    file_id: usize,
    warnings: &mut Vec<ParseError>,
    refs: &mut Vec<CommandRef>,
) {
    let mut parts = text.split_whitespace();
    let Some(name) = parts.next() else {
        return;
    };

    let count = match parts.next() {
        None => None,
        Some(token) => match token.parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => {
                warnings.push(ParseError::warning(
                    format!("invalid count '{token}' for command '{name}', defaulting to 1"),
                    span.clone(),
                    file_id,
                ));
                Some(1)
            }
        },
    };

    if parts.next().is_some() {
        warnings.push(ParseError::warning(
            format!("trailing text after count ignored on command '{name}'"),
            span.clone(),
            file_id,
        ));
    }

    refs.push(CommandRef {
        name: name.to_string(),
        count,
        span: span.clone(),
    });
}

/// Replace `{{NAME}}` macros in a code-block line with their literal
/// expansion under the block's tool context. Misses stay literal so
/// authors can type `{{...}}` on purpose outside a matching context.
pub fn expand_macros(line: &str, tool: ToolContext, templates: &TemplateRegistry) -> String {
    let mut out = String::new();
    let mut rest = line;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = after[..close].trim();
        match templates.lookup(tool, name) {
            Some(template) => out.push_str(&template.literal()),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}
