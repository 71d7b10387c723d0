use std::fmt;

use sxt::command::Direction;

use crate::event::Event;

/// Escape trigger byte of the legacy single-string format. The
/// character after a trigger is a one-letter designator naming a
/// control action.
pub const TRIGGER: char = '\u{7}';

const BACKSPACE_CHAR: char = '\u{8}';

/// Render an event list into the legacy escape string. Counted events
/// repeat their character or escape pair; everything round-trips
/// through [`decode`] up to run coalescing.
pub fn encode(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        match event {
            Event::Literal(text) => out.push_str(text),
            Event::Newline(n) => repeat(&mut out, '\n', *n),
            Event::Backspace(n) => repeat(&mut out, BACKSPACE_CHAR, *n),
            Event::Arrow(dir, n) => {
                let designator = match dir {
                    Direction::Up => 'u',
                    Direction::Down => 'd',
                    Direction::Left => 'l',
                    Direction::Right => 'r',
                };
                for _ in 0..*n {
                    escape(&mut out, designator);
                }
            }
            Event::Sleep(n) => {
                for _ in 0..*n {
                    escape(&mut out, 'z');
                }
            }
            Event::Home => escape(&mut out, 'b'),
            Event::End => escape(&mut out, 'e'),
            Event::CtrlHome => escape(&mut out, 'B'),
            Event::CtrlEnd => escape(&mut out, 'E'),
            Event::PageUp => escape(&mut out, 'U'),
            Event::PageDown => escape(&mut out, 'D'),
            Event::ShiftPress => escape(&mut out, 's'),
            Event::ShiftRelease => escape(&mut out, 'S'),
            Event::Escape => escape(&mut out, 'C'),
            Event::ExitArrowMode => escape(&mut out, 'Q'),
        }
    }
    out
}

fn escape(out: &mut String, designator: char) {
    out.push(TRIGGER);
    out.push(designator);
}

fn repeat(out: &mut String, ch: char, count: u32) {
    for _ in 0..count {
        out.push(ch);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ends on a trigger byte with no designator after it.
    TruncatedEscape,
    UnknownDesignator(char),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TruncatedEscape => {
                write!(f, "input ends in the middle of an escape sequence")
            }
            DecodeError::UnknownDesignator(ch) => {
                write!(f, "unknown escape designator {:?}", ch)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Parse a legacy escape string back into events. Runs of the same
/// counted event coalesce into one, so decoding an encoded canonical
/// list reproduces it exactly.
pub fn decode(input: &str) -> Result<Vec<Event>, DecodeError> {
    let mut decoder = Decoder::new();
    for ch in input.chars() {
        decoder.push_char(ch)?;
    }
    decoder.finish()
}

struct Decoder {
    events: Vec<Event>,
    literal: String,
    awaiting_designator: bool,
}

impl Decoder {
    fn new() -> Self {
        Decoder {
            events: Vec::new(),
            literal: String::new(),
            awaiting_designator: false,
        }
    }

    fn push_char(&mut self, ch: char) -> Result<(), DecodeError> {
        if self.awaiting_designator {
            self.awaiting_designator = false;
            let event = match ch {
                'u' => Event::Arrow(Direction::Up, 1),
                'd' => Event::Arrow(Direction::Down, 1),
                'l' => Event::Arrow(Direction::Left, 1),
                'r' => Event::Arrow(Direction::Right, 1),
                's' => Event::ShiftPress,
                'S' => Event::ShiftRelease,
                'e' => Event::End,
                'b' => Event::Home,
                'E' => Event::CtrlEnd,
                'B' => Event::CtrlHome,
                'U' => Event::PageUp,
                'D' => Event::PageDown,
                'C' => Event::Escape,
                'z' => Event::Sleep(1),
                'Q' => Event::ExitArrowMode,
                other => return Err(DecodeError::UnknownDesignator(other)),
            };
            self.push_event(event);
            return Ok(());
        }

        match ch {
            TRIGGER => {
                self.flush_literal();
                self.awaiting_designator = true;
            }
            '\n' => {
                self.flush_literal();
                self.push_event(Event::Newline(1));
            }
            BACKSPACE_CHAR => {
                self.flush_literal();
                self.push_event(Event::Backspace(1));
            }
            other => self.literal.push(other),
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Event>, DecodeError> {
        if self.awaiting_designator {
            return Err(DecodeError::TruncatedEscape);
        }
        self.flush_literal();
        Ok(self.events)
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            let text = std::mem::take(&mut self.literal);
            self.events.push(Event::Literal(text));
        }
    }

    /// Append an event, merging it into the previous one when both
    /// are the same counted keystroke.
    fn push_event(&mut self, event: Event) {
        match (self.events.last_mut(), &event) {
            (Some(Event::Newline(n)), Event::Newline(m)) => *n += m,
            (Some(Event::Backspace(n)), Event::Backspace(m)) => *n += m,
            (Some(Event::Sleep(n)), Event::Sleep(m)) => *n += m,
            (Some(Event::Arrow(prev, n)), Event::Arrow(dir, m)) if prev == dir => *n += m,
            _ => self.events.push(event),
        }
    }
}
