//! Replacement selection for an equipment slot that is about to be vacated.

use vaultops_core::CharacterId;

use crate::bucket::BucketCategory;
use crate::item::Item;
use crate::snapshot::AccountSnapshot;

/// Picks an owned item to fill a slot being vacated by `moving`.
///
/// `None` is not an error: it tells the planner the slot cannot be vacated
/// safely. The answer must never be `moving` itself.
pub trait ReplacementSelector {
    fn find_replacement<'s>(
        &self,
        character_id: &CharacterId,
        bucket: BucketCategory,
        moving: &Item,
        snapshot: &'s AccountSnapshot,
    ) -> Option<&'s Item>;
}

/// First instanced item of the bucket in the character's inventory, in the
/// order the service reported the inventory.
///
/// Non-instanced items are skipped since they cannot be equipped, and so is
/// any copy of the moving or currently equipped item a stale snapshot still
/// lists in inventory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstInInventory;

impl ReplacementSelector for FirstInInventory {
    fn find_replacement<'s>(
        &self,
        character_id: &CharacterId,
        bucket: BucketCategory,
        moving: &Item,
        snapshot: &'s AccountSnapshot,
    ) -> Option<&'s Item> {
        let equipped = snapshot.equipped(character_id, bucket);
        snapshot
            .inventory_in_bucket(character_id, bucket)
            .filter(|item| item.is_instanced() && !item.is_same_copy(moving))
            .find(|item| !equipped.is_some_and(|current| current.is_same_copy(item)))
    }
}

/// [`FirstInInventory`] as a free function.
pub fn find_replacement<'s>(
    character_id: &CharacterId,
    bucket: BucketCategory,
    moving: &Item,
    snapshot: &'s AccountSnapshot,
) -> Option<&'s Item> {
    FirstInInventory.find_replacement(character_id, bucket, moving, snapshot)
}
