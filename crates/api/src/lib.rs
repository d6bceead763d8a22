//! Waypoint API - Command and query interface for workflow editing.
//!
//! This crate defines the typed intent language for a [`WorkflowBuilder`].
//! Commands represent user intent and are:
//! - Serializable (for recording, scripting, driving the builder from a shell)
//! - Intent-based (what to do, not how to do it)
//! - Safe to replay (stale ids are no-ops, not failures)
//!
//! # Example
//! ```ignore
//! use api::{execute_command, Command};
//!
//! let cmd = Command::AddStage {
//!     label: "Intake".into(),
//!     position: Some(Vec2::new(100.0, 100.0)),
//! };
//! let result = execute_command(&mut builder, cmd);
//! ```
//!
//! [`WorkflowBuilder`]: builder::WorkflowBuilder

mod command;
mod executor;
mod query;
mod target;

pub use command::*;
pub use executor::{execute_command, execute_json, execute_query};
pub use query::*;
pub use target::*;
