//! Output formatting.
//!
//! Records go to stdout as JSON: one object for a single-item `read`, an array for
//! `read --multiple` and `list`. Indented with two spaces unless `compact` is set.
//!
//! Commands without records print their confirmation lines on stdout. Warnings always
//! go to stderr so record output stays valid JSON.

use super::styles;
use keyrakenapp::commands::{CmdMessage, CmdResult, MessageLevel};
use keyrakenapp::error::Result;
use serde::Serialize;

/// How a command's result is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Exactly one record, printed as an object.
    Single,
    /// Records printed as an array, possibly empty.
    Many,
    /// Messages only.
    Messages,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub stdout: String,
    pub stderr: String,
}

pub fn render(result: &CmdResult, shape: Shape, compact: bool) -> Result<Rendered> {
    let mut rendered = Rendered::default();

    match shape {
        Shape::Single => {
            if let Some(record) = result.listed_items.first() {
                push_line(&mut rendered.stdout, &to_json(record, compact)?);
            }
        }
        Shape::Many => {
            push_line(&mut rendered.stdout, &to_json(&result.listed_items, compact)?);
        }
        Shape::Messages => {}
    }

    for message in &result.messages {
        if matches!(message.level, MessageLevel::Warning) {
            push_line(&mut rendered.stderr, &format_message(message));
        } else if shape == Shape::Messages {
            push_line(&mut rendered.stdout, &format_message(message));
        }
    }

    Ok(rendered)
}

/// The `Error: ...` line printed on failure.
pub fn format_error(message: &str) -> String {
    format!("{} {}", styles::error().apply_to("Error:"), message)
}

fn format_message(message: &CmdMessage) -> String {
    let style = styles::for_level(&message.level);
    match message.level {
        MessageLevel::Warning => format!("{} {}", style.apply_to("Warning:"), message.content),
        MessageLevel::Success | MessageLevel::Info => {
            style.apply_to(&message.content).to_string()
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
