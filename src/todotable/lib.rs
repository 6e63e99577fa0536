//! # Todotable Architecture
//!
//! Todotable is a **UI-agnostic data table engine**: it loads a JSON array of
//! records once, then answers search, filter, sort and pagination queries
//! entirely in memory. The terminal client is one consumer of the library,
//! not the library itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments and browse intents, renders templates   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns cache + source, loads sessions                      │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (session.rs, commands.rs)                           │
//! │  - QueryState transitions, one handler per intent           │
//! │  - pipeline.rs: search → filter → sort                      │
//! │  - paginate.rs: page slice, window, limit selector          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Data Layer (records.rs, source.rs, store/)                 │
//! │  - Cache-first load, immutable original dataset             │
//! │  - FileCache (production), InMemoryCache (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! The original dataset is loaded once and never mutated. Every query result
//! is rebuilt from it:
//!
//! ```text
//! original ──search──▶ snapshot ──filter──▶ ──sort──▶ working set ──page──▶ rows
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns Rust values. The
//! one exception is [`source::HttpSource`], which performs the single network
//! read, and [`store::fs::FileCache`], which persists its payload.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One-shot queries and user-facing messages
//! - [`session`]: Query state and intent handlers
//! - [`pipeline`]: Search, filter and sort
//! - [`paginate`]: Page slicing, pagination window, limit selector
//! - [`records`]: Cache-first loading and the original dataset
//! - [`source`]: Record sources (HTTP, static)
//! - [`store`]: Cache abstraction and implementations
//! - [`model`]: The `Record` type
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing, the browse loop and templated rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod paginate;
pub mod pipeline;
pub mod records;
pub mod session;
pub mod source;
pub mod store;
