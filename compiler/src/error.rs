use std::fmt;
use std::ops::Range;

use sxt::parser::ParseError;

#[derive(Debug)]
pub enum CompileError {
    UnresolvedCommand { name: String, tool: String },
    Custom(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnresolvedCommand { name, tool } => {
                write!(f, "unresolved command '{}' in {} context", name, tool)
            }
            CompileError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CompileError {}

/// A compile error or warning enriched with source location information.
#[derive(Debug)]
pub struct DiagnosticError {
    pub error: CompileError,
    pub span: Option<Range<usize>>,
    pub source_id: usize,
    pub is_warning: bool,
}

impl DiagnosticError {
    /// Create a warning diagnostic with a source span.
    pub fn warning(message: String, span: Range<usize>, source_id: usize) -> Self {
        DiagnosticError {
            error: CompileError::Custom(message),
            span: Some(span),
            source_id,
            is_warning: true,
        }
    }
}

impl From<ParseError> for DiagnosticError {
    fn from(error: ParseError) -> Self {
        DiagnosticError {
            is_warning: error.is_warning(),
            span: Some(error.span.clone()),
            source_id: error.file_id,
            error: CompileError::Custom(error.message),
        }
    }
}

impl From<CompileError> for DiagnosticError {
    fn from(error: CompileError) -> Self {
        DiagnosticError {
            error,
            span: None,
            source_id: 0,
            is_warning: false,
        }
    }
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for DiagnosticError {}

/// Either the parser rejected the script, or compilation of a parsed
/// script failed.
#[derive(Debug)]
pub enum CompileFailure {
    Parse(Vec<ParseError>),
    Compile(DiagnosticError),
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileFailure::Parse(errors) => {
                write!(f, "{} parse error(s)", errors.len())
            }
            CompileFailure::Compile(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CompileFailure {}
