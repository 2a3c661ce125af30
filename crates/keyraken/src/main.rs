//! # Keyraken CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file only
//! installs logging, invokes `cli::run()` and turns errors into exit codes.
//!
//! ## Workspace Structure
//!
//! Keyraken is organized as a Cargo workspace with two crates:
//! - `crates/keyrakenapp/`: core library, UI-agnostic
//! - `crates/keyraken/`: this CLI tool, depends on `keyrakenapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/keyraken/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Validation + dispatch (commands.rs)                      │
//! │  - JSON / message output (render.rs)                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/keyrakenapp/src/api.rs)                  │
//! │  - Resolves secrets through the prompt capability           │
//! │  - Dispatches to command modules, relocks on the way out    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/keyrakenapp/src/commands/*)          │
//! │  - Filter engine, merge/replace, partial delete             │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Backend (crates/keyrakenapp/src/store/*)                   │
//! │  - Secret Service over D-Bus, or in memory for tests        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. The default level is `warn`,
//! `--verbose` raises it to `debug` and `RUST_LOG` overrides both.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | not found |
//! | 2 | usage error (clap) |
//! | 3 | collection locked |
//! | 4 | ambiguous selection |
//! | 5 | invalid filter |
//! | 6 | invalid input |
//! | 7 | nothing to update |
//! | 8 | unlock cancelled |
//! | 9 | no secret provided |
//! | 10 | backend error |

mod cli;

use clap::Parser;
use tracing_subscriber::{
    filter::LevelFilter, prelude::__tracing_subscriber_SubscriberExt as _,
    util::SubscriberInitExt as _, EnvFilter,
};

fn main() {
    let cli = cli::setup::Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = cli::run(cli) {
        eprintln!("{}", cli::format_error(&e.to_string()));
        std::process::exit(e.exit_code());
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
