//! # CLI Behavior
//!
//! This is **one possible UI client** for keyraken, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Secrets on the Command Line
//!
//! `--secret` and `--new_secret` accept the secret directly, which leaves it in the shell
//! history. Passing an empty value (`--new_secret ""`) asks for it on a hidden prompt
//! instead; `create` prompts whenever `--secret` is missing.
//!
//! ## Locked Collections
//!
//! Item commands refuse to run on a locked collection. `--unlock` asks the secret
//! service to unlock it first (the service shows its own password dialog) and
//! `--relock` locks it again afterwards, also when the command failed.
//!
//! ## Module Structure
//!
//! - `commands`: Validation and dispatch to the API
//! - `prompt`: Hidden secret prompt
//! - `render`: JSON and message output
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling

mod commands;
mod prompt;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
pub use render::format_error;
