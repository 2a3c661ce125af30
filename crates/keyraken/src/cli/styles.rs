//! Terminal styles for confirmation and error lines.
//!
//! `console` drops the escape codes on its own when the stream is not a terminal, so
//! piped output stays plain.

use console::Style;
use keyrakenapp::commands::MessageLevel;

pub fn success() -> Style {
    Style::new().green()
}

pub fn info() -> Style {
    Style::new().dim()
}

pub fn warning() -> Style {
    Style::new().yellow().bold().for_stderr()
}

pub fn error() -> Style {
    Style::new().red().bold().for_stderr()
}

pub fn for_level(level: &MessageLevel) -> Style {
    match level {
        MessageLevel::Success => success(),
        MessageLevel::Info => info(),
        MessageLevel::Warning => warning(),
    }
}
