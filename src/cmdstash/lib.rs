//! # Cmdstash Architecture
//!
//! Cmdstash is a **UI-agnostic catalog library** for reusable shell commands,
//! their categories, and free-form notes. The command-line binary is one
//! client of the library, not the application itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, renders tables, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over the catalog components                  │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Catalog Layer (catalog/*.rs)                               │
//! │  - CategoryRegistry, CommandCatalog, NoteCatalog,           │
//! │    QueryFilterEngine: validation and integrity rules        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Store: owns the SQLite connection, schema, seed data     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns
//! `Result` values, and never writes to stdout/stderr or exits the
//! process. The same core could back a TUI or a web UI.
//!
//! ## Identifiers
//!
//! Every entity carries a stable integer identifier assigned by the store
//! at creation. All mutating APIs are identifier-first; resolving a
//! displayed name back to an identifier is the client's job, using the
//! identifiers already present in list output.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`catalog`]: Registries and the query/filter engine
//! - [`store`]: SQLite-backed persistence
//! - [`model`]: Core data types (`Category`, `Command`, `Note`)
//! - [`backup`]: Backup, listing and restore of the database file
//! - [`config`]: Column-width preferences for list views
//! - [`meta`]: Display-only product metadata
//! - [`clipboard`]: Cross-platform clipboard support
//! - [`error`]: Error types

pub mod api;
pub mod backup;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod meta;
pub mod model;
pub mod store;
