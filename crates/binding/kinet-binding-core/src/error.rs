//! Error taxonomy for the binding core.
//!
//! Everything here is a programming-contract failure: attach/detach calls
//! made out of order, a callback fired in the wrong execution mode, or a
//! collaborator reference that must exist but does not. None of these are
//! retried. A view merely lacking the direct-mutation capability is NOT an
//! error; that case falls back to the re-render path silently.

use kinet_graph_core::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("props instance is already attached")]
    AlreadyAttached,
    #[error("props instance is not attached")]
    NotAttached,
    #[error("missing style composite for key `{0}`")]
    MissingStyleComposite(String),
    #[error("host change callback fired while the property set is native")]
    NativeCallback,
    #[error("native config requested before the property set was made native")]
    NotNative,
    #[error("no resolvable view for component `{0}`")]
    ViewUnresolved(String),
    #[error("invalid lifecycle transition from {from}")]
    Lifecycle { from: &'static str },
    #[error(transparent)]
    Graph(#[from] GraphError),
}
