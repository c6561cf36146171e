use serde::{Deserialize, Serialize};

use vaultops_inventory::{Item, Location};

/// One resolved drop: move `item` from `source` to `target`.
///
/// Built when a drop is resolved, consumed immediately by the planner, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub item: Item,
    pub source: Location,
    pub target: Location,
}

impl TransferRequest {
    pub fn new(item: Item, source: Location, target: Location) -> Self {
        Self {
            item,
            source,
            target,
        }
    }
}
