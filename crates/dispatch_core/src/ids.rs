//! Injectable request-id source, so ids are reproducible in tests.

use bevy_ecs::prelude::Resource;

/// Sequential request-id generator: `R-0001`, `R-0002`, ...
#[derive(Debug, Resource)]
pub struct RequestIdSource {
    next: u64,
}

impl Default for RequestIdSource {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl RequestIdSource {
    /// Start numbering from `first`, to partition id ranges in tests.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn mint(&mut self) -> String {
        let id = format!("R-{:04}", self.next);
        self.next += 1;
        id
    }
}
