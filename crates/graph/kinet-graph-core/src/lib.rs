//! kinet-graph-core: the animated-node dependency graph.
//!
//! Nodes live in an arena indexed by [`NodeTag`] and hold refcounted
//! dependent edges. Attaching the first dependent of a composite wires the
//! composite to its inputs; removing the last one unwinds those edges
//! recursively. Host-thread writes propagate through dependent edges and
//! return the set of consumer composites that must be notified.

pub mod ids;
pub mod registry;
pub mod types;

pub use ids::{NodeTag, TagAllocator};
pub use registry::{GraphError, GraphRegistry, Notifications};
pub use types::{GraphConfig, Node, NodeKind, StyleEntry};
