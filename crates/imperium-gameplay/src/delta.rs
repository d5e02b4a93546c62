//! The observable outcome of one tick.

use std::collections::BTreeMap;

use imperium_types::{Building, ResourceDelta, VillageId};
use serde::Serialize;

/// Everything a tick changed, keyed by village. Wire shape matches the
/// `/cmd/tick` response: village ids become string keys when serialized.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TickDelta {
    pub resources_changed: BTreeMap<VillageId, ResourceDelta>,
    pub builds_completed: Vec<(VillageId, Building)>,
}

impl TickDelta {
    pub fn is_empty(&self) -> bool {
        self.resources_changed.is_empty() && self.builds_completed.is_empty()
    }

    /// Fold another delta into this one, summing per-village resource
    /// changes and appending completions in order.
    pub fn absorb(&mut self, other: TickDelta) {
        for (vid, delta) in other.resources_changed {
            self.resources_changed
                .entry(vid)
                .and_modify(|existing| existing.merge(&delta))
                .or_insert(delta);
        }
        self.builds_completed.extend(other.builds_completed);
    }
}
