use std::fmt;

/// The target application whose command vocabulary and macro set are
/// active for a block. `Generic` is the vocabulary shared by all tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolContext {
    Generic,
    Python,
    Vim,
    Shell,
    Vscode,
}

impl ToolContext {
    /// Match a tool name from an open tag, case-insensitively.
    /// Returns `None` for names outside the known set; the parser
    /// degrades those to `Generic` with a warning rather than failing
    /// the whole script.
    pub fn from_name(name: &str) -> Option<ToolContext> {
        match name.to_ascii_uppercase().as_str() {
            "GENERIC" => Some(ToolContext::Generic),
            "PYTHON" => Some(ToolContext::Python),
            "VIM" => Some(ToolContext::Vim),
            "SHELL" => Some(ToolContext::Shell),
            "VSCODE" => Some(ToolContext::Vscode),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolContext::Generic => "GENERIC",
            ToolContext::Python => "PYTHON",
            ToolContext::Vim => "VIM",
            ToolContext::Shell => "SHELL",
            ToolContext::Vscode => "VSCODE",
        }
    }
}

impl fmt::Display for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
