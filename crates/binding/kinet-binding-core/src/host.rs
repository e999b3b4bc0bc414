//! Render-framework collaborator contract.

use kinet_api_core::{ValueMap, ViewTag};

use crate::error::BindingError;

/// Lifecycle and view services the owning render framework must provide.
///
/// The framework owns the render tree; this crate only asks it for the
/// concrete view behind a component, mutates that view when allowed, and
/// requests a re-render when it is not.
pub trait RenderHost {
    /// Resolve the concrete view handle currently mounted for `component`.
    /// A component without a live view is a fatal collaborator failure
    /// ([`BindingError::ViewUnresolved`]), not a condition to retry.
    fn resolve_view(&mut self, component: &str) -> Result<ViewTag, BindingError>;

    /// Event target for a view. Scroll containers return the inner
    /// scrollable node; everything else returns the view itself.
    fn event_target(&mut self, view: ViewTag) -> ViewTag {
        view
    }

    /// Whether the view exposes the imperative set-props capability.
    fn supports_direct_mutation(&self, view: ViewTag) -> bool;

    /// Imperatively set property values on a mounted view, bypassing
    /// re-render. Only called after `supports_direct_mutation` returned true.
    fn set_props_directly(&mut self, view: ViewTag, values: &ValueMap);

    /// Ask the framework to re-render the component.
    fn request_render(&mut self, component: &str);
}
