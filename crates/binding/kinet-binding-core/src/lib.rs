//! kinet-binding-core: binds declarative property bags to the animated
//! dependency graph.
//!
//! The engine here decides, on every prop update, which declared properties
//! are animated values, styles, or event bindings; attaches and detaches
//! them from the graph; and chooses between direct view mutation and a full
//! re-render when a host-driven node recomputes. The render framework and
//! the native animation backend are reached through traits and never owned.

pub mod animated_props;
pub mod backend;
pub mod component;
pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod host;
pub mod observer;
pub mod props;
pub mod scroll;

pub use animated_props::{AnimatedProps, NativePropsConfig, ResolvedProps};
pub use backend::NativeAnimationBackend;
pub use component::{AnimatedComponent, ChangeOutcome, Lifecycle};
pub use config::WrapperConfig;
pub use diff::DiffPlan;
pub use error::BindingError;
pub use event::{AnimatedEvent, EventDriver, EventMapping};
pub use host::RenderHost;
pub use observer::{BindDecision, BindingObserver, LogObserver, NoopObserver};
pub use props::{PropValue, PropertyBag, RawProp, STYLE_KEY};
pub use scroll::{scroll_event_payload, ScrollDispatchGate, ScrollSample};

// Re-exports for consumers (hosts/adapters)
pub use kinet_api_core::{EventPath, TransformOp, Value, ValueKind, ValueMap, ViewTag};
pub use kinet_graph_core::{GraphRegistry, NodeTag, Notifications, StyleEntry};
