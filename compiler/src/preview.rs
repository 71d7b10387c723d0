use sxt::command::Direction;

use crate::event::Event;

/// Lines a Page Up or Page Down jumps over.
const PAGE_LINES: usize = 10;

/// Marker drawn at the cursor position by [`Preview::text_with_marker`].
pub const CURSOR_MARKER: char = '│';

/// The state of a simulated editor buffer after replaying events: the
/// buffer lines and the cursor position. `column` is a character
/// index, not a byte index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub lines: Vec<String>,
    pub line: usize,
    pub column: usize,
}

impl Preview {
    /// The buffer contents as one string.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// The buffer contents with the cursor marker inserted at the
    /// cursor position.
    pub fn text_with_marker(&self) -> String {
        let mut out = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            if index == self.line {
                let split = byte_index(line, self.column);
                out.push_str(&line[..split]);
                out.push(CURSOR_MARKER);
                out.push_str(&line[split..]);
            } else {
                out.push_str(line);
            }
        }
        out
    }

    /// Byte offset of the cursor within [`Preview::text`].
    pub fn cursor_offset(&self) -> usize {
        let before: usize = self.lines[..self.line].iter().map(|l| l.len() + 1).sum();
        before + byte_index(&self.lines[self.line], self.column)
    }
}

/// Replay events against an empty buffer and return the resulting
/// state. With `upto` set, only the first `upto` events are applied,
/// which lets a caller step through a script event by event.
pub fn render(events: &[Event], upto: Option<usize>) -> Preview {
    let end = upto.unwrap_or(events.len()).min(events.len());
    let mut buffer = Buffer::new();
    for event in &events[..end] {
        buffer.apply(event);
    }
    buffer.into_preview()
}

struct Buffer {
    lines: Vec<String>,
    line: usize,
    column: usize,
}

impl Buffer {
    fn new() -> Self {
        Buffer {
            lines: vec![String::new()],
            line: 0,
            column: 0,
        }
    }

    fn into_preview(self) -> Preview {
        Preview {
            lines: self.lines,
            line: self.line,
            column: self.column,
        }
    }

    fn apply(&mut self, event: &Event) {
        match event {
            Event::Literal(text) => self.insert(text),
            Event::Newline(n) => {
                for _ in 0..*n {
                    self.newline();
                }
            }
            Event::Backspace(n) => {
                for _ in 0..*n {
                    self.backspace();
                }
            }
            Event::Arrow(dir, n) => {
                for _ in 0..*n {
                    self.arrow(*dir);
                }
            }
            Event::Home => self.column = 0,
            Event::End => self.column = self.line_len(),
            Event::CtrlHome => {
                self.line = 0;
                self.column = 0;
            }
            Event::CtrlEnd => {
                self.line = self.lines.len() - 1;
                self.column = self.line_len();
            }
            Event::PageUp => {
                self.line = self.line.saturating_sub(PAGE_LINES);
                self.clamp_column();
            }
            Event::PageDown => {
                self.line = (self.line + PAGE_LINES).min(self.lines.len() - 1);
                self.clamp_column();
            }
            // Modifier, sleep and mode events do not touch the buffer.
            Event::ShiftPress
            | Event::ShiftRelease
            | Event::Escape
            | Event::Sleep(_)
            | Event::ExitArrowMode => {}
        }
    }

    fn insert(&mut self, text: &str) {
        let split = byte_index(&self.lines[self.line], self.column);
        self.lines[self.line].insert_str(split, text);
        self.column += text.chars().count();
    }

    /// Split the current line at the cursor; the remainder becomes the
    /// next line and the cursor lands at its start.
    fn newline(&mut self) {
        let split = byte_index(&self.lines[self.line], self.column);
        let rest = self.lines[self.line].split_off(split);
        self.lines.insert(self.line + 1, rest);
        self.line += 1;
        self.column = 0;
    }

    /// Delete the character before the cursor. At the start of a line
    /// the line joins onto the previous one instead.
    fn backspace(&mut self) {
        if self.column > 0 {
            let remove = byte_index(&self.lines[self.line], self.column - 1);
            self.lines[self.line].remove(remove);
            self.column -= 1;
        } else if self.line > 0 {
            let current = self.lines.remove(self.line);
            self.line -= 1;
            self.column = self.line_len();
            self.lines[self.line].push_str(&current);
        }
    }

    fn arrow(&mut self, dir: Direction) {
        match dir {
            Direction::Up => {
                self.line = self.line.saturating_sub(1);
                self.clamp_column();
            }
            Direction::Down => {
                self.line = (self.line + 1).min(self.lines.len() - 1);
                self.clamp_column();
            }
            Direction::Left => self.column = self.column.saturating_sub(1),
            Direction::Right => self.column = (self.column + 1).min(self.line_len()),
        }
    }

    fn line_len(&self) -> usize {
        self.lines[self.line].chars().count()
    }

    fn clamp_column(&mut self) {
        self.column = self.column.min(self.line_len());
    }
}

/// Byte offset of character index `column` within `line`. A column at
/// or past the end maps to the line's end.
fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
