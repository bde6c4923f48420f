//! kanri: a status-driven task board.
//!
//! Boards contain tasks organized into columns keyed by free-form status
//! strings. The [`board`] module holds the whole subsystem: the status
//! model, SQLite persistence, the REST API, and the embedded single-page
//! client.

pub mod board;
