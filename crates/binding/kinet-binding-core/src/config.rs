//! Wrapper configuration.

use serde::{Deserialize, Serialize};

/// Configuration injected into an [`AnimatedComponent`](crate::AnimatedComponent)
/// at construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WrapperConfig {
    /// Component label used for render-host callbacks and diagnostics.
    pub label: String,
    /// Force the re-render path even when the bound view supports direct
    /// mutation. Injected by tests; off by default.
    #[serde(default)]
    pub force_rerender: bool,
}

impl WrapperConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            force_rerender: false,
        }
    }
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self::new("animated")
    }
}
