//! Scroll event plumbing for scroll-container hosts.
//!
//! Scroll containers report every pixel of movement, including repeats at
//! the same position. The gate below drops duplicate offsets and derives
//! per-axis fling velocity from the spacing of accepted samples, so hosts
//! can forward clean `contentOffset`/`velocity` payloads into
//! [`AnimatedComponent::dispatch_event`](crate::AnimatedComponent::dispatch_event).

use serde_json::{json, Value as JsonValue};

/// One accepted scroll sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollSample {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
}

/// Per-view gate between raw scroll callbacks and event dispatch.
#[derive(Debug, Default)]
pub struct ScrollDispatchGate {
    last: Option<(f32, f32)>,
    last_time_ms: f64,
    velocity_x: f32,
    velocity_y: f32,
}

impl ScrollDispatchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a raw offset observed at `now_ms`. Returns a sample when the
    /// position moved since the last accepted one, `None` otherwise.
    pub fn offer(&mut self, x: f32, y: f32, now_ms: f64) -> Option<ScrollSample> {
        if let Some((last_x, last_y)) = self.last {
            if last_x == x && last_y == y {
                return None;
            }
            let dt_s = ((now_ms - self.last_time_ms) / 1000.0) as f32;
            if dt_s > 0.0 {
                self.velocity_x = (x - last_x) / dt_s;
                self.velocity_y = (y - last_y) / dt_s;
            }
        }
        self.last = Some((x, y));
        self.last_time_ms = now_ms;
        Some(ScrollSample {
            x,
            y,
            velocity_x: self.velocity_x,
            velocity_y: self.velocity_y,
        })
    }

    /// Velocity of the most recent accepted movement.
    pub fn velocity(&self) -> (f32, f32) {
        (self.velocity_x, self.velocity_y)
    }
}

/// Canonical scroll event payload, shaped for `EventPath` mappings such as
/// `contentOffset.x` and `velocity.y`.
pub fn scroll_event_payload(sample: &ScrollSample) -> JsonValue {
    json!({
        "contentOffset": { "x": sample.x, "y": sample.y },
        "velocity": { "x": sample.velocity_x, "y": sample.velocity_y },
    })
}
