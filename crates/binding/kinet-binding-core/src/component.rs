//! Component wrapper: owns one [`AnimatedProps`] across a component's
//! lifetime and turns graph change notifications into either a direct view
//! mutation or a re-render request.
//!
//! The wrapper never owns the render tree. It is fed lifecycle transitions
//! by the render framework and resolves the concrete view through the
//! [`RenderHost`] collaborator on every commit.

use kinet_graph_core::{GraphRegistry, Notifications};
use serde_json::Value as JsonValue;

use crate::animated_props::{AnimatedProps, ResolvedProps};
use crate::backend::NativeAnimationBackend;
use crate::config::WrapperConfig;
use crate::error::BindingError;
use crate::event::EventDriver;
use crate::host::RenderHost;
use crate::observer::BindingObserver;
use crate::props::PropertyBag;

/// Lifecycle of the wrapped component. `Unmounted` after an unmount is
/// terminal; a wrapper is never remounted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounting,
    Mounted,
    Unmounting,
}

impl Lifecycle {
    fn name(self) -> &'static str {
        match self {
            Lifecycle::Unmounted => "Unmounted",
            Lifecycle::Mounting => "Mounting",
            Lifecycle::Mounted => "Mounted",
            Lifecycle::Unmounting => "Unmounting",
        }
    }
}

/// What one change notification resolved to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Notification was for another composite.
    Ignored,
    /// No committed view yet; effect queued until mount completes.
    Deferred,
    /// View mutated in place with the animated-only value bag.
    DirectMutation,
    /// Full re-render requested from the framework.
    Rendered,
}

#[derive(Debug)]
pub struct AnimatedComponent {
    cfg: WrapperConfig,
    props: AnimatedProps,
    state: Lifecycle,
    has_mounted: bool,
    pending_change: bool,
}

impl AnimatedComponent {
    pub fn new(cfg: WrapperConfig, initial: PropertyBag) -> Self {
        Self {
            cfg,
            props: AnimatedProps::new(initial),
            state: Lifecycle::Unmounted,
            has_mounted: false,
            pending_change: false,
        }
    }

    pub fn with_observer(
        cfg: WrapperConfig,
        initial: PropertyBag,
        observer: Box<dyn BindingObserver>,
    ) -> Self {
        Self {
            cfg,
            props: AnimatedProps::with_observer(initial, observer),
            state: Lifecycle::Unmounted,
            has_mounted: false,
            pending_change: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.cfg.label
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn props(&self) -> &AnimatedProps {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut AnimatedProps {
        &mut self.props
    }

    fn bad_transition(&self) -> BindingError {
        BindingError::Lifecycle {
            from: self.state.name(),
        }
    }

    /// Enter `Mounting`: attach the property set before the first render,
    /// because render reads the resolved value bag.
    pub fn will_mount(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
    ) -> Result<(), BindingError> {
        if self.state != Lifecycle::Unmounted || self.has_mounted {
            return Err(self.bad_transition());
        }
        self.state = Lifecycle::Mounting;
        self.has_mounted = true;
        self.props.attach(graph, backend)
    }

    /// Resolved value bag for rendering.
    pub fn render_values(
        &mut self,
        graph: &GraphRegistry,
    ) -> Result<ResolvedProps, BindingError> {
        self.props.get_value(graph)
    }

    /// Commit: bind the concrete view, attach events against the (possibly
    /// nested) event target, and flush a change that arrived before commit.
    pub fn did_mount(
        &mut self,
        graph: &GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
        host: &mut dyn RenderHost,
    ) -> Result<(), BindingError> {
        if self.state != Lifecycle::Mounting {
            return Err(self.bad_transition());
        }
        let view = host.resolve_view(&self.cfg.label)?;
        let target = host.event_target(view);
        self.props.update_view(view, target, backend);
        self.state = Lifecycle::Mounted;

        if self.pending_change {
            self.pending_change = false;
            self.apply_change(graph, host)?;
        }
        Ok(())
    }

    /// Prop update while mounted: diff and reattach per the binding rules.
    pub fn will_receive_props(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
        next: PropertyBag,
    ) -> Result<(), BindingError> {
        if self.state != Lifecycle::Mounted {
            return Err(self.bad_transition());
        }
        self.props.update_props(graph, backend, next)
    }

    /// After a committed update: the concrete view may have changed due to
    /// re-parenting or ref churn. Rebinding is a no-op when it has not.
    pub fn did_update(
        &mut self,
        backend: &mut dyn NativeAnimationBackend,
        host: &mut dyn RenderHost,
    ) -> Result<(), BindingError> {
        if self.state != Lifecycle::Mounted {
            return Err(self.bad_transition());
        }
        let view = host.resolve_view(&self.cfg.label)?;
        let target = host.event_target(view);
        self.props.update_view(view, target, backend);
        Ok(())
    }

    /// Teardown: detach events and every subscription, then retire. Queued
    /// pre-commit changes are dropped, not errored.
    pub fn will_unmount(
        &mut self,
        graph: &mut GraphRegistry,
        backend: &mut dyn NativeAnimationBackend,
    ) -> Result<(), BindingError> {
        match self.state {
            Lifecycle::Mounting | Lifecycle::Mounted => {}
            _ => return Err(self.bad_transition()),
        }
        self.state = Lifecycle::Unmounting;
        self.pending_change = false;
        self.props.detach(graph, backend)?;
        self.props.dispose(graph);
        self.state = Lifecycle::Unmounted;
        Ok(())
    }

    /// Host-thread change notification entry point. Called synchronously
    /// within the tick that mutated the graph.
    pub fn handle_notifications(
        &mut self,
        notes: &Notifications,
        graph: &GraphRegistry,
        host: &mut dyn RenderHost,
    ) -> Result<ChangeOutcome, BindingError> {
        let Some(tag) = self.props.composite_tag() else {
            return Ok(ChangeOutcome::Ignored);
        };
        if !notes.contains(tag) {
            return Ok(ChangeOutcome::Ignored);
        }
        self.on_change(graph, host)
    }

    fn on_change(
        &mut self,
        graph: &GraphRegistry,
        host: &mut dyn RenderHost,
    ) -> Result<ChangeOutcome, BindingError> {
        // In native mode the backend is the sole source of updates; the host
        // callback firing at all means the mode switch was violated.
        if self.props.is_native() {
            return Err(BindingError::NativeCallback);
        }
        // The framework may discard uncommitted work before mount; an
        // imperative mutation now would be unsafe or wasted.
        let Some(view) = self.props.view() else {
            self.pending_change = true;
            return Ok(ChangeOutcome::Deferred);
        };
        if self.state != Lifecycle::Mounted {
            self.pending_change = true;
            return Ok(ChangeOutcome::Deferred);
        }

        if self.cfg.force_rerender || !host.supports_direct_mutation(view) {
            host.request_render(&self.cfg.label);
            return Ok(ChangeOutcome::Rendered);
        }
        let values = self.props.get_animated_only_value(graph)?;
        host.set_props_directly(view, &values);
        Ok(ChangeOutcome::DirectMutation)
    }

    fn apply_change(
        &mut self,
        graph: &GraphRegistry,
        host: &mut dyn RenderHost,
    ) -> Result<ChangeOutcome, BindingError> {
        self.on_change(graph, host)
    }

    /// Host-path event dispatch from the render framework. Applies the
    /// event's payload mapping and processes the resulting notifications in
    /// the same tick. Native-driver events are owned by the backend and are
    /// ignored here.
    pub fn dispatch_event(
        &mut self,
        name: &str,
        payload: &JsonValue,
        graph: &mut GraphRegistry,
        host: &mut dyn RenderHost,
    ) -> Result<ChangeOutcome, BindingError> {
        let Some(event) = self.props.bag().event(name) else {
            return Ok(ChangeOutcome::Ignored);
        };
        if event.driver == EventDriver::Native {
            return Ok(ChangeOutcome::Ignored);
        }
        let event = event.clone();
        let notes = event.apply(graph, payload)?;
        self.handle_notifications(&notes, graph, host)
    }
}
