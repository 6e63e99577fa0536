//! # Todotable CLI
//!
//! The binary is thin: the CLI lives in `cli/`, and this file only invokes
//! `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/)                                           │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + handlers (commands.rs)                  │
//! │  - Interactive intent loop (browse.rs)                      │
//! │  - Terminal rendering via minijinja templates (render.rs)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (todotable::api)                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Templates live in `cli/templates/` and are embedded with `include_str!()`,
//! so layout changes stay in template files while the binary stays
//! self-contained.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
