//! # Flowforge
//!
//! Flowforge turns a flat list of automation actions, each annotated with
//! an execution mode, into a directed execution graph in the wire format of
//! a remote workflow engine, complete with a non-overlapping 2-D layout.
//! The input list typically comes from an LLM, so the build degrades
//! gracefully: anything short of a contract violation produces a usable
//! graph plus diagnostics.
//!
//! ## Core Features
//!
//! - **Chain-head lowering**: four lane heads (main, parallel, true branch,
//!   false branch) route each action onto its execution lane without
//!   explicit predecessor references
//! - **Layered layout**: left-to-right Sugiyama-style drawing with
//!   crossing-reducing barycenter ordering and overlap repair
//! - **Graceful degradation**: unknown services, unplaced nodes and
//!   unreachable nodes become diagnostics on a still-valid graph
//! - **Concurrent builds**: all build state is instance-scoped; one
//!   assembler serves any number of threads
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flowforge::{GraphAssembler, IntentSpec, StaticCatalog};
//!
//! let assembler = GraphAssembler::new(Arc::new(StaticCatalog::builtin()));
//!
//! let intent = IntentSpec::from_json(json_str)?;
//! let output = assembler.assemble(&intent)?;
//! println!("{}", output.graph.to_json()?);
//! ```

mod assembler;
mod build;
mod catalog;
mod common;
mod config;
mod diagnostics;
mod error;
mod layout;
mod model;
mod validator;

pub use assembler::{BuildOutput, DEFAULT_GRAPH_NAME, GraphAssembler};
pub use build::{ChainState, FlowGraphBuilder, NodeFactory};
pub use catalog::{NodeCatalog, StaticCatalog};
pub use common::Vars;
pub use config::{Config, LayoutConfig};
pub use diagnostics::Diagnostic;
pub use error::FlowforgeError;
pub use layout::LayoutEngine;
pub use model::*;
pub use validator::GraphValidator;

/// Result type alias for Flowforge operations.
pub type Result<T> = std::result::Result<T, FlowforgeError>;
