//! # Workflow graph
//!
//! The graph store is the single owner of every node and edge on the
//! canvas. Other components read [`GraphSnapshot`]s and call back into the
//! store with intents; nothing else holds an authoritative copy.
//!
//! - [`store`]: the arena and its total, synchronous mutation operations
//! - [`containment`]: which stage (if any) owns a task card after a move
//! - [`cascade`]: stage deletion and display-number re-sequencing

pub mod cascade;
pub mod containment;
mod event;
pub mod store;

pub use cascade::{delete_stage, renumber_stages};
pub use containment::{
    candidate_stages, resolve_parent, resolve_parent_for, revalidate, settle, Candidate, Placement,
};
pub use event::GraphEvent;
pub use store::{GraphSnapshot, GraphStore, Removal};
