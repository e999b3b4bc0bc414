//! kinet-api-core: shared value model for the kinet prop-binding crates.
//!
//! This crate defines the value union exchanged with mounted views, the
//! payload-path selector used by event mappings, and the opaque view handle.
//! It is renderer-agnostic; the graph and binding crates build on it.

pub mod event_path;
pub mod value;
pub mod view;

pub use event_path::{EventPath, PathError};
pub use value::{TransformOp, Value, ValueKind, ValueMap};
pub use view::ViewTag;
