//! Kanban board over a single markdown file.
//!
//! `TASKS.md` is the only store: four status sections, one `###` block per
//! task. Every change re-parses the file and rewrites it from a fixed
//! template.

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod parser;
pub mod store;
pub mod task;
pub mod writer;

pub use error::{Error, Result};
pub use store::TaskStore;
pub use task::{Category, NewTask, Status, Task, TaskPatch};
