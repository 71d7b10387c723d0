pub mod error;
pub mod event;
pub mod generator;
pub mod legacy;
pub mod preview;
pub mod resolver;

pub use error::{CompileError, CompileFailure, DiagnosticError};
pub use event::Event;
pub use generator::{compile, generate, Compiled};
pub use preview::{render, Preview};
