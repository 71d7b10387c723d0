use std::collections::HashMap;

use crate::tool::ToolContext;

/// A macro expansion: literal text with optional cursor markers. A
/// marker records where the logical cursor should land after the
/// expansion is typed; it is preview-side metadata and is never
/// injected into the typed output or the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Cursor,
}

impl Template {
    pub fn new(segments: Vec<Segment>) -> Self {
        Template { segments }
    }

    /// A template that is plain text with no cursor marker.
    pub fn text(text: impl Into<String>) -> Self {
        Template {
            segments: vec![Segment::Text(text.into())],
        }
    }

    /// The literal text substituted into a code block.
    pub fn literal(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let Segment::Text(text) = segment {
                out.push_str(text);
            }
        }
        out
    }

    /// Rendered text plus the byte offset of the first cursor marker,
    /// for preview display of the template itself.
    pub fn render(&self) -> (String, Option<usize>) {
        let mut out = String::new();
        let mut cursor = None;
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Cursor => {
                    if cursor.is_none() {
                        cursor = Some(out.len());
                    }
                }
            }
        }
        (out, cursor)
    }
}

/// Read-only macro vocabulary keyed by tool context. Unlike command
/// lookup there is no generic fallback: a `{{NAME}}` token in a block
/// with no matching tool entry stays literal text.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<ToolContext, HashMap<String, Template>>,
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        TemplateRegistry {
            templates: HashMap::new(),
        }
    }

    /// The built-in macros: Python snippets plus the keystroke
    /// vocabularies of the tools whose commands are plain text, so
    /// `{{SAVE}}` in a Vim code block types `:w` and Enter.
    pub fn builtin() -> Self {
        use Segment::{Cursor, Text};

        let mut registry = TemplateRegistry::empty();
        let python = ToolContext::Python;

        registry.register(python, "IMPORT_NUMPY", Template::text("import numpy as np\n"));
        registry.register(python, "IMPORT_PANDAS", Template::text("import pandas as pd\n"));
        registry.register(
            python,
            "IMPORT_MATPLOTLIB",
            Template::text("import matplotlib.pyplot as plt\n"),
        );
        registry.register(
            python,
            "IF_NAME_MAIN",
            Template::text("if __name__ == \"__main__\":"),
        );
        registry.register(
            python,
            "PRINT_DEBUG",
            Template::new(vec![
                Text("print(f\"DEBUG: {".into()),
                Cursor,
                Text("}\")".into()),
            ]),
        );
        registry.register(
            python,
            "TRY_EXCEPT",
            Template::new(vec![
                Text("try:\n    ".into()),
                Cursor,
                Text("\nexcept Exception as e:\n    print(f\"Error: {e}\")".into()),
            ]),
        );

        let vim = ToolContext::Vim;
        registry.register(vim, "INSERT_MODE", Template::text("i"));
        registry.register(vim, "APPEND_MODE", Template::text("a"));
        registry.register(vim, "VISUAL_MODE", Template::text("v"));
        registry.register(vim, "COMMAND_MODE", Template::text(":"));
        registry.register(vim, "SAVE", Template::text(":w\n"));
        registry.register(vim, "QUIT", Template::text(":q\n"));
        registry.register(vim, "SAVE_QUIT", Template::text(":wq\n"));
        registry.register(vim, "FORCE_QUIT", Template::text(":q!\n"));
        registry.register(vim, "DELETE_LINE", Template::text("dd"));
        registry.register(vim, "YANK_LINE", Template::text("yy"));
        registry.register(vim, "PASTE", Template::text("p"));
        registry.register(vim, "UNDO", Template::text("u"));
        registry.register(vim, "WORD_FORWARD", Template::text("w"));
        registry.register(vim, "WORD_BACKWARD", Template::text("b"));
        registry.register(vim, "LINE_END", Template::text("$"));
        registry.register(vim, "LINE_START", Template::text("0"));
        registry.register(vim, "FILE_TOP", Template::text("gg"));
        registry.register(vim, "FILE_BOTTOM", Template::text("G"));

        let shell = ToolContext::Shell;
        registry.register(shell, "CLEAR", Template::text("clear\n"));
        registry.register(shell, "TAB_COMPLETE", Template::text("\t"));

        registry
    }

    /// Register a macro. Names are normalized to uppercase.
    pub fn register(&mut self, tool: ToolContext, name: &str, template: Template) {
        self.templates
            .entry(tool)
            .or_default()
            .insert(name.to_ascii_uppercase(), template);
    }

    /// Look a macro up under exactly the given tool context.
    pub fn lookup(&self, tool: ToolContext, name: &str) -> Option<&Template> {
        self.templates
            .get(&tool)
            .and_then(|table| table.get(&name.to_ascii_uppercase()))
    }
}
