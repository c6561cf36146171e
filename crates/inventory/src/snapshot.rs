//! Read-only view of the account used for planning.

use std::collections::BTreeMap;

use vaultops_core::{CharacterId, ItemInstanceId};

use crate::bucket::BucketCategory;
use crate::item::Item;
use crate::location::Location;

/// Equipment and inventory of one character.
///
/// Equipment is keyed by bucket, so a slot can never hold two items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterState {
    equipment: BTreeMap<BucketCategory, Item>,
    inventory: Vec<Item>,
}

impl CharacterState {
    pub fn equipped(&self, bucket: BucketCategory) -> Option<&Item> {
        self.equipment.get(&bucket)
    }

    pub fn equipment(&self) -> impl Iterator<Item = &Item> {
        self.equipment.values()
    }

    /// Inventory items in the order the service reported them.
    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }
}

/// Snapshot of characters, their equipment/inventory, and the shared pool.
///
/// The planner only ever reads this. Callers refresh it from the service
/// after every completed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSnapshot {
    characters: BTreeMap<CharacterId, CharacterState>,
    vault: Vec<Item>,
}

impl AccountSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a character with empty equipment and inventory.
    pub fn add_character(&mut self, character_id: CharacterId) {
        self.characters.entry(character_id).or_default();
    }

    /// Put `item` into its bucket's equipment slot, returning the previous occupant.
    pub fn set_equipped(&mut self, character_id: CharacterId, item: Item) -> Option<Item> {
        let item = item.owned_by(character_id.clone());
        self.characters
            .entry(character_id)
            .or_default()
            .equipment
            .insert(item.bucket, item)
    }

    pub fn push_inventory(&mut self, character_id: CharacterId, item: Item) {
        let item = item.owned_by(character_id.clone());
        self.characters
            .entry(character_id)
            .or_default()
            .inventory
            .push(item);
    }

    pub fn push_vault(&mut self, item: Item) {
        self.vault.push(item.unowned());
    }

    pub fn with_equipped(mut self, character_id: CharacterId, item: Item) -> Self {
        self.set_equipped(character_id, item);
        self
    }

    pub fn with_inventory_item(mut self, character_id: CharacterId, item: Item) -> Self {
        self.push_inventory(character_id, item);
        self
    }

    pub fn with_vault_item(mut self, item: Item) -> Self {
        self.push_vault(item);
        self
    }

    pub fn character(&self, character_id: &CharacterId) -> Option<&CharacterState> {
        self.characters.get(character_id)
    }

    pub fn has_character(&self, character_id: &CharacterId) -> bool {
        self.characters.contains_key(character_id)
    }

    pub fn character_ids(&self) -> impl Iterator<Item = &CharacterId> {
        self.characters.keys()
    }

    pub fn equipped(&self, character_id: &CharacterId, bucket: BucketCategory) -> Option<&Item> {
        self.character(character_id)?.equipped(bucket)
    }

    /// Inventory of a character; empty for unknown characters.
    pub fn inventory(&self, character_id: &CharacterId) -> &[Item] {
        self.character(character_id)
            .map(CharacterState::inventory)
            .unwrap_or(&[])
    }

    pub fn inventory_in_bucket<'s>(
        &'s self,
        character_id: &CharacterId,
        bucket: BucketCategory,
    ) -> impl Iterator<Item = &'s Item> + 's {
        self.inventory(character_id)
            .iter()
            .filter(move |item| item.bucket == bucket)
    }

    pub fn vault(&self) -> &[Item] {
        &self.vault
    }

    /// Find an instanced item anywhere on the account.
    pub fn locate(&self, instance_id: &ItemInstanceId) -> Option<(Location, &Item)> {
        let matches = |item: &&Item| item.instance_id() == Some(instance_id);

        for (character_id, state) in &self.characters {
            if let Some(item) = state.equipment.values().find(matches) {
                return Some((Location::equipment(character_id.clone(), item.bucket), item));
            }
            if let Some(item) = state.inventory.iter().find(matches) {
                return Some((Location::inventory(character_id.clone()), item));
            }
        }

        self.vault
            .iter()
            .find(matches)
            .map(|item| (Location::SharedPool, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultops_core::ItemHash;

    fn a() -> CharacterId {
        CharacterId::new("1")
    }

    fn item(instance: &str, bucket: BucketCategory) -> Item {
        Item::instanced(ItemHash(500), ItemInstanceId::new(instance), bucket)
    }

    #[test]
    fn equipping_replaces_the_previous_occupant() {
        let mut snapshot = AccountSnapshot::new();
        assert!(snapshot
            .set_equipped(a(), item("10", BucketCategory::Helmet))
            .is_none());

        let previous = snapshot
            .set_equipped(a(), item("11", BucketCategory::Helmet))
            .unwrap();
        assert_eq!(previous.instance_id(), Some(&ItemInstanceId::new("10")));
        assert_eq!(
            snapshot
                .equipped(&a(), BucketCategory::Helmet)
                .and_then(Item::instance_id),
            Some(&ItemInstanceId::new("11"))
        );
        assert_eq!(snapshot.character(&a()).unwrap().equipment().count(), 1);
    }

    #[test]
    fn inserted_items_carry_their_owner() {
        let snapshot = AccountSnapshot::new()
            .with_inventory_item(a(), item("20", BucketCategory::Gauntlets))
            .with_vault_item(item("30", BucketCategory::General).owned_by(a()));

        assert_eq!(snapshot.inventory(&a())[0].owner_character_id, Some(a()));
        assert_eq!(snapshot.vault()[0].owner_character_id, None);
    }

    #[test]
    fn inventory_of_unknown_character_is_empty() {
        let snapshot = AccountSnapshot::new();
        assert!(snapshot.inventory(&a()).is_empty());
        assert!(snapshot.equipped(&a(), BucketCategory::Helmet).is_none());
    }

    #[test]
    fn inventory_in_bucket_filters_and_keeps_order() {
        let snapshot = AccountSnapshot::new()
            .with_inventory_item(a(), item("1", BucketCategory::Helmet))
            .with_inventory_item(a(), item("2", BucketCategory::LegArmor))
            .with_inventory_item(a(), item("3", BucketCategory::Helmet));

        let ids: Vec<_> = snapshot
            .inventory_in_bucket(&a(), BucketCategory::Helmet)
            .filter_map(|i| i.instance_id().map(|id| id.as_str().to_string()))
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn locate_reports_each_location_kind() {
        let snapshot = AccountSnapshot::new()
            .with_equipped(a(), item("1", BucketCategory::Helmet))
            .with_inventory_item(a(), item("2", BucketCategory::Helmet))
            .with_vault_item(item("3", BucketCategory::General));

        let (loc, _) = snapshot.locate(&ItemInstanceId::new("1")).unwrap();
        assert_eq!(loc, Location::equipment(a(), BucketCategory::Helmet));

        let (loc, _) = snapshot.locate(&ItemInstanceId::new("2")).unwrap();
        assert_eq!(loc, Location::inventory(a()));

        let (loc, found) = snapshot.locate(&ItemInstanceId::new("3")).unwrap();
        assert_eq!(loc, Location::SharedPool);
        assert_eq!(found.bucket, BucketCategory::General);

        assert!(snapshot.locate(&ItemInstanceId::new("4")).is_none());
    }
}
