//! Node identifiers and a simple allocator.

use serde::{Deserialize, Serialize};

/// Index of a node slot in the registry arena. Tags are monotonic and never
/// reused, so a stale tag resolves to an empty slot instead of aliasing a
/// newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeTag(pub u32);

/// Monotonic allocator for NodeTag.
#[derive(Default, Debug)]
pub struct TagAllocator {
    next: u32,
}

impl TagAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> NodeTag {
        let id = NodeTag(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
