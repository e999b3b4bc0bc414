//! Opaque handles for mounted native views.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a concrete mounted view. Allocated and resolved by the render
/// framework; this crate only compares and forwards it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ViewTag(pub u32);

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}
