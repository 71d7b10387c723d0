use std::fmt;

use sxt::command::Direction;

/// A single typing event. Counted variants carry how many times the
/// keystroke repeats; the count is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Literal text typed character by character. Never contains a
    /// newline.
    Literal(String),
    Newline(u32),
    Backspace(u32),
    Arrow(Direction, u32),
    Home,
    End,
    CtrlHome,
    CtrlEnd,
    PageUp,
    PageDown,
    ShiftPress,
    ShiftRelease,
    Escape,
    Sleep(u32),
    ExitArrowMode,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Literal(text) => write!(f, "type {:?}", text),
            Event::Newline(n) => write!(f, "newline x{}", n),
            Event::Backspace(n) => write!(f, "backspace x{}", n),
            Event::Arrow(dir, n) => write!(f, "arrow {} x{}", dir, n),
            Event::Home => write!(f, "home"),
            Event::End => write!(f, "end"),
            Event::CtrlHome => write!(f, "ctrl+home"),
            Event::CtrlEnd => write!(f, "ctrl+end"),
            Event::PageUp => write!(f, "page-up"),
            Event::PageDown => write!(f, "page-down"),
            Event::ShiftPress => write!(f, "shift press"),
            Event::ShiftRelease => write!(f, "shift release"),
            Event::Escape => write!(f, "escape"),
            Event::Sleep(n) => write!(f, "sleep x{}", n),
            Event::ExitArrowMode => write!(f, "exit arrow mode"),
        }
    }
}
