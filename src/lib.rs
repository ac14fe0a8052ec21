//! Scene graph and reversible command model for interactive diagrams.
//!
//! A diagram is a tree of identifiable elements (graph, nodes, edges, ...)
//! whose capabilities (selection, position, size, viewport) are decided per
//! element. Every change to the tree is a [`command::Command`] that can be
//! undone and redone. A [`stack::CommandStack`] owns the current model, turns
//! incoming [`action::Action`]s into commands, and keeps the history.
//!
//! Rendering, DOM input, and animation interpolation belong to the host.
//! Commands always land on their final state; the logical duration they are
//! given is for hosts that animate.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Elements, capabilities, the id index, and the root |
//! | [`schema`] | Serializable plain-data element trees |
//! | [`factory`] | Schema ↔ scene graph conversion and capability rules |
//! | [`command`] | Command trait, execution context, lifecycle state machine |
//! | [`select`] | Select / select-all commands |
//! | [`movement`] | Move command |
//! | [`bounds`] | Set-bounds command and bounds queries |
//! | [`viewport`] | Set-viewport, center, and fit-to-screen commands |
//! | [`action`] | Tagged action enum and action → command mapping |
//! | [`stack`] | Command stack with undo/redo history |
//! | [`geometry`] | Points, dimensions, bounds |
//! | [`config`] | Environment-driven configuration |
//! | [`error`] | Error types and codes |
//! | [`consts`] | Shared defaults |

pub mod action;
pub mod bounds;
pub mod command;
pub mod config;
pub mod consts;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod model;
pub mod movement;
pub mod schema;
pub mod select;
pub mod stack;
pub mod viewport;
