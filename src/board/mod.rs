//! The board subsystem: boards, columns, and tasks over a REST API.
//!
//! ## Overview
//!
//! Boards own tasks and columns. A column is identified by a free-form
//! status string that tasks reference by convention, not by foreign key;
//! three static statuses (TODO, IN_PROGRESS, DONE) are always presented as
//! columns without being stored. The rules that keep columns and tasks
//! mutually consistent live in [`status`]; everything else is a direct
//! mapping from an HTTP request to a SQLite query and back.
//!
//! ## Module Map
//!
//! | Module     | Responsibility                                          |
//! |------------|---------------------------------------------------------|
//! | `models`   | Shared types: `Board`, `Task`, `Column`, view types     |
//! | `status`   | Status key derivation, static columns, ordering rules   |
//! | `validate` | Field-level validation run before any store access      |
//! | `db`       | SQLite access via `DbHandle` (thin `Arc<Mutex<_>>`)     |
//! | `api`      | axum route handlers, `AppState`, response envelope      |
//! | `server`   | `ServerConfig`, router assembly, SPA asset serving      |
//! | `embedded` | Statically embedded client bundle (`rust-embed`)        |

pub mod api;
pub mod db;
pub mod embedded;
pub mod models;
pub mod server;
pub mod status;
pub mod validate;
