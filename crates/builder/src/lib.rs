//! # Workflow builder
//!
//! A [`WorkflowBuilder`] is one editing session over a workflow graph. It
//! wires the graph store to everything around it: the pool of tasks waiting
//! to be placed, the pan/zoom viewport, drag-and-drop, the label editor and
//! write-through persistence.
//!
//! Hosts feed it pointer samples and intents, then read back a
//! [`RenderSnapshot`] and drain [`BuilderEvent`]s.

mod builder;
mod default_graph;
pub mod drag;
pub mod edit;
mod event;
mod pool;
pub mod render;
mod settings;
mod viewport;

#[cfg(test)]
mod tests;

pub use builder::WorkflowBuilder;
pub use default_graph::default_graph;
pub use drag::{DragController, DragPayload, DragState, PoolDrop};
pub use edit::{EditField, EditSession, LabelEditor};
pub use event::BuilderEvent;
pub use pool::TaskPool;
pub use render::{NodeHandles, NodeIntent, NodeView, RenderNode, RenderSnapshot};
pub use settings::{IntrinsicSizes, Settings, SettingsError};
pub use viewport::Viewport;
