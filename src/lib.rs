//! Rollbook - Student Records Query CLI
//!
//! Rollbook is an interactive command-line query tool over a fixed student
//! records schema (students, courses, addresses, reviews) stored in a
//! file-backed `SQLite` database. It reads menu commands, runs parameterized
//! read queries, renders the results as aligned tables, and optionally
//! stores a result set as JSON or XML.
//!
//! # Architecture
//! Single-threaded and synchronous: one command line is processed fully,
//! export prompt included, before the next is read. The database connection
//! is opened and closed per command; nothing is shared across iterations.
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`db`] - Database access layer (fixed parameterized queries)
//! - [`output`] - Table rendering and header/value mapping
//! - [`export`] - JSON/XML export with per-command row schemas
//! - [`repl`] - Command parsing and the interactive loop

pub mod db;
pub mod error;
pub mod export;
pub mod output;
pub mod repl;

// Re-export commonly used types for convenience
pub use db::{Database, Row, SCHEMA_SCRIPT, SHORTFALL_MARK};
pub use error::{Result, RollbookError};
pub use export::{ExportFormat, Exporter, RowSchema};
pub use repl::{Command, ParsedInput};
