//! Brock, a small personal task assistant.
//!
//! Commands arrive as text, are parsed into a [`parser::Command`] and run by
//! an [`assistant::Assistant`], which keeps the [`task_list::TaskList`] and the
//! save file in step.

pub mod assistant;
pub mod codec;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod task_list;
pub mod tui;
