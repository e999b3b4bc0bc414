//! Injected reattach/reuse diagnostics.
//!
//! Purely observational; no decision here feeds back into binding behavior.

use kinet_api_core::ViewTag;
use std::fmt;

/// What the diff engine decided for one key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindDecision {
    /// Key carried over by reference; existing subscription preserved.
    Reuse,
    /// Key's value differed; binding replaced.
    Reattach,
    /// Key set changed; whole property set reattached.
    Structural,
    /// Reattach-all flag was pending; whole property set reattached.
    Forced,
}

/// Observer for per-key binding decisions, passed at construction.
pub trait BindingObserver: fmt::Debug {
    fn on_decision(&self, key: &str, decision: BindDecision, view: Option<ViewTag>);
}

/// Default observer: drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl BindingObserver for NoopObserver {
    fn on_decision(&self, _key: &str, _decision: BindDecision, _view: Option<ViewTag>) {}
}

/// Observer that reports each decision through the `log` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl BindingObserver for LogObserver {
    fn on_decision(&self, key: &str, decision: BindDecision, view: Option<ViewTag>) {
        match view {
            Some(view) => {
                log::trace!(target: "kinet::binding", "{decision:?} key=`{key}` on {view}");
            }
            None => log::trace!(target: "kinet::binding", "{decision:?} key=`{key}` (unbound)"),
        }
    }
}
