use std::collections::HashMap;
use std::ops::Range;

use crate::tool::ToolContext;

/// A command line from a command block, before resolution: a name and
/// an optional repeat count.
#[derive(Debug, Clone)]
pub struct CommandRef {
    pub name: String,
    /// `None` means the count was omitted; the resolver applies the
    /// action's default of 1.
    pub count: Option<u32>,
    /// Byte span of the originating source line.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// What a resolved command does. `Text` covers tool-specific
/// expansions that type literal keystrokes (Vim's `SAVE` types `:w`
/// followed by Enter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Arrow(Direction),
    Home,
    End,
    CtrlHome,
    CtrlEnd,
    PageUp,
    PageDown,
    ShiftPress,
    ShiftRelease,
    Escape,
    Backspace,
    Enter,
    Sleep,
    ExitArrowMode,
    Text(String),
}

impl Action {
    /// Whether a repeat count multiplies this action. Non-repeatable
    /// actions execute once; the generator warns when a count > 1 is
    /// given for one.
    pub fn repeatable(&self) -> bool {
        matches!(
            self,
            Action::Arrow(_) | Action::Backspace | Action::Enter | Action::Sleep
        )
    }
}

/// Read-only command vocabulary: a generic table consulted for every
/// block, plus per-tool tables consulted first when the block names a
/// tool. Built once at startup and passed by reference into each
/// compile pass; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    generic: HashMap<String, Action>,
    tools: HashMap<ToolContext, HashMap<String, Action>>,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        CommandRegistry {
            generic: HashMap::new(),
            tools: HashMap::new(),
        }
    }

    /// The built-in vocabulary: the generic control commands plus the
    /// Vim, shell and VS Code tables.
    pub fn builtin() -> Self {
        let mut registry = CommandRegistry::empty();

        use Action::*;
        use Direction::*;

        registry.register_generic("ARROW_UP", Arrow(Up));
        registry.register_generic("ARROW_DOWN", Arrow(Down));
        registry.register_generic("ARROW_LEFT", Arrow(Left));
        registry.register_generic("ARROW_RIGHT", Arrow(Right));
        registry.register_generic("SHIFT_PRESS", ShiftPress);
        registry.register_generic("SHIFT_RELEASE", ShiftRelease);
        registry.register_generic("END", End);
        registry.register_generic("HOME", Home);
        registry.register_generic("CTRL_END", CtrlEnd);
        registry.register_generic("CTRL_HOME", CtrlHome);
        registry.register_generic("PAGE_UP", PageUp);
        registry.register_generic("PAGE_DOWN", PageDown);
        registry.register_generic("ESCAPE", Escape);
        registry.register_generic("BACKSPACE", Backspace);
        registry.register_generic("ENTER", Enter);
        registry.register_generic("SLEEP", Sleep);
        registry.register_generic("EXIT_ARROW_MODE", ExitArrowMode);

        let vim = ToolContext::Vim;
        registry.register(vim, "NORMAL_MODE", Escape);
        registry.register(vim, "INSERT_MODE", Text("i".into()));
        registry.register(vim, "APPEND_MODE", Text("a".into()));
        registry.register(vim, "VISUAL_MODE", Text("v".into()));
        registry.register(vim, "COMMAND_MODE", Text(":".into()));
        registry.register(vim, "SAVE", Text(":w\n".into()));
        registry.register(vim, "QUIT", Text(":q\n".into()));
        registry.register(vim, "SAVE_QUIT", Text(":wq\n".into()));
        registry.register(vim, "FORCE_QUIT", Text(":q!\n".into()));
        registry.register(vim, "DELETE_LINE", Text("dd".into()));
        registry.register(vim, "YANK_LINE", Text("yy".into()));
        registry.register(vim, "PASTE", Text("p".into()));
        registry.register(vim, "UNDO", Text("u".into()));
        registry.register(vim, "WORD_FORWARD", Text("w".into()));
        registry.register(vim, "WORD_BACKWARD", Text("b".into()));
        registry.register(vim, "LINE_END", Text("$".into()));
        registry.register(vim, "LINE_START", Text("0".into()));
        registry.register(vim, "FILE_TOP", Text("gg".into()));
        registry.register(vim, "FILE_BOTTOM", Text("G".into()));

        let shell = ToolContext::Shell;
        registry.register(shell, "CLEAR", Text("clear\n".into()));
        registry.register(shell, "TAB_COMPLETE", Text("\t".into()));
        registry.register(shell, "HISTORY_UP", Arrow(Up));
        registry.register(shell, "HISTORY_DOWN", Arrow(Down));
        registry.register(shell, "MOVE_TO_START", Home);
        registry.register(shell, "MOVE_TO_END", End);

        // The legacy table encoded VS Code's Ctrl+S through the shift
        // designator; the downstream executor owns the chord mapping.
        registry.register(ToolContext::Vscode, "SAVE", ShiftPress);

        let python = ToolContext::Python;
        registry.register(python, "IMPORT_NUMPY", Text("import numpy as np\n".into()));
        registry.register(python, "IMPORT_PANDAS", Text("import pandas as pd\n".into()));
        registry.register(
            python,
            "IMPORT_MATPLOTLIB",
            Text("import matplotlib.pyplot as plt\n".into()),
        );

        registry
    }

    /// Register a command in the generic table. Names are normalized
    /// to uppercase; later registrations replace earlier ones.
    pub fn register_generic(&mut self, name: &str, action: Action) {
        self.generic.insert(normalize(name), action);
    }

    /// Register a command in a tool-specific table.
    pub fn register(&mut self, tool: ToolContext, name: &str, action: Action) {
        self.tools
            .entry(tool)
            .or_default()
            .insert(normalize(name), action);
    }

    /// Look a name up: the tool-specific table first, the generic
    /// table second. Matching is case-insensitive.
    pub fn lookup(&self, tool: ToolContext, name: &str) -> Option<&Action> {
        let name = normalize(name.trim());
        self.tools
            .get(&tool)
            .and_then(|table| table.get(&name))
            .or_else(|| self.generic.get(&name))
    }
}

fn normalize(name: &str) -> String {
    name.to_ascii_uppercase()
}
