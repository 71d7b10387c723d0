use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use compiler::event::Event;
use rand::Rng;

// Per-keystroke pacing, in seconds. Tuned so replayed typing reads
// like a person typing at a steady clip.
const NORMAL_DELAY: f64 = 0.08;
const SPECIAL_DELAY: f64 = 0.25;
const SPACE_DELAY: f64 = 0.5;
const NEWLINE_DELAY: f64 = 0.8;
const BACKSPACE_DELAY: f64 = 0.6;
const ARROW_DELAY: f64 = 0.05;
const CONTROL_DELAY: f64 = 0.1;

/// Flat delay used when pacing is disabled. Still non-zero so the
/// receiving application can keep up.
const NO_DELAY: f64 = 0.02;

/// Seconds one SLEEP unit pauses for.
const SLEEP_UNIT: f64 = 5.0;

/// Seconds granted to focus the target window before replay starts.
const FOCUS_GRACE: f64 = 3.0;

/// Shifted punctuation takes a reach for the shift key and gets the
/// slower special delay. Unshifted punctuation types at normal speed.
const SPECIAL_CHARS: &str = "`~!@#$%^&*()_+{}|:\"<>?";

pub struct ReplayOptions {
    pub window_title: String,
    pub no_delay: bool,
}

/// Replay an event stream with typing pacing: literal text and
/// newlines go to stdout keystroke by keystroke, control events are
/// narrated on stderr. Each delay gets 20% of jitter either way.
pub fn replay(events: &[Event], options: &ReplayOptions) -> io::Result<()> {
    wait_for_focus(options);

    let mut stdout = io::stdout();
    for event in events {
        match event {
            Event::Literal(text) => {
                for ch in text.chars() {
                    write!(stdout, "{ch}")?;
                    stdout.flush()?;
                    pause(char_delay(ch), options);
                }
            }
            Event::Newline(n) => {
                for _ in 0..*n {
                    writeln!(stdout)?;
                    stdout.flush()?;
                    pause(NEWLINE_DELAY, options);
                }
            }
            Event::Backspace(n) => {
                narrate(event);
                for _ in 0..*n {
                    pause(BACKSPACE_DELAY, options);
                }
            }
            Event::Arrow(_, n) => {
                narrate(event);
                for _ in 0..*n {
                    pause(ARROW_DELAY, options);
                }
            }
            Event::Sleep(n) => {
                narrate(event);
                if !options.no_delay {
                    thread::sleep(Duration::from_secs_f64(SLEEP_UNIT * f64::from(*n)));
                }
            }
            other => {
                narrate(other);
                pause(CONTROL_DELAY, options);
            }
        }
    }
    writeln!(stdout)?;
    Ok(())
}

fn narrate(event: &Event) {
    eprintln!("[{event}]");
}

fn char_delay(ch: char) -> f64 {
    if ch == ' ' {
        SPACE_DELAY
    } else if SPECIAL_CHARS.contains(ch) {
        SPECIAL_DELAY
    } else {
        NORMAL_DELAY
    }
}

fn pause(seconds: f64, options: &ReplayOptions) {
    let base = if options.no_delay { NO_DELAY } else { seconds };
    let jitter = rand::thread_rng().gen_range(0.8..1.2);
    thread::sleep(Duration::from_secs_f64(base * jitter));
}

fn wait_for_focus(options: &ReplayOptions) {
    eprintln!(
        "focus the '{}' window; typing starts in {} seconds",
        options.window_title, FOCUS_GRACE
    );
    if !options.no_delay {
        thread::sleep(Duration::from_secs_f64(FOCUS_GRACE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_shifted_punctuation_gets_the_special_delay() {
        assert_eq!(char_delay('!'), SPECIAL_DELAY);
        assert_eq!(char_delay('"'), SPECIAL_DELAY);
        assert_eq!(char_delay('{'), SPECIAL_DELAY);
        assert_eq!(char_delay('.'), NORMAL_DELAY);
        assert_eq!(char_delay(','), NORMAL_DELAY);
        assert_eq!(char_delay('\''), NORMAL_DELAY);
        assert_eq!(char_delay('a'), NORMAL_DELAY);
        assert_eq!(char_delay(' '), SPACE_DELAY);
    }
}
