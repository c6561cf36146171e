//! Decoding of the account service's profile payload into an [`AccountSnapshot`].
//!
//! Only the components the planner needs are modelled: character equipment,
//! character inventories and the profile (vault) inventory. Unknown fields are
//! ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

use vaultops_core::{BucketHash, CharacterId, ItemHash, ItemInstanceId};

use crate::bucket::BucketCategory;
use crate::item::Item;
use crate::snapshot::AccountSnapshot;

/// Top-level profile response (`{"Response": {...}}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "Response")]
    pub response: ProfileComponents,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileComponents {
    #[serde(default)]
    pub profile_inventory: Option<Component<ItemList>>,
    #[serde(default)]
    pub character_inventories: Option<Component<BTreeMap<String, ItemList>>>,
    #[serde(default)]
    pub character_equipment: Option<Component<BTreeMap<String, ItemList>>>,
    #[serde(default)]
    pub characters: Option<Component<BTreeMap<String, serde_json::Value>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Component<T> {
    pub data: Option<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemList {
    #[serde(default)]
    pub items: Vec<ProfileItem>,
}

/// Item as reported inside a profile component.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileItem {
    pub item_hash: u32,
    #[serde(default)]
    pub item_instance_id: Option<String>,
    pub bucket_hash: u32,
}

impl ProfileItem {
    fn to_item(&self, resolve_bucket: &dyn Fn(ItemHash) -> Option<BucketCategory>) -> Item {
        let item_hash = ItemHash(self.item_hash);
        let bucket = resolve_bucket(item_hash)
            .unwrap_or_else(|| BucketCategory::from_hash(BucketHash(self.bucket_hash)));
        Item {
            item_hash,
            item_instance_id: self.item_instance_id.clone().map(ItemInstanceId::new),
            bucket,
            owner_character_id: None,
        }
    }
}

impl AccountSnapshot {
    /// Build a snapshot using the bucket hashes exactly as reported.
    ///
    /// Vault items report the vault's own bucket (`General`); use
    /// [`AccountSnapshot::from_profile_with`] to resolve their real category
    /// from the item catalog when equipping out of the vault.
    pub fn from_profile(profile: &ProfileResponse) -> Self {
        Self::from_profile_with(profile, |_| None)
    }

    /// Build a snapshot, asking `resolve_bucket` for each item's category first
    /// and falling back to the reported bucket hash.
    pub fn from_profile_with(
        profile: &ProfileResponse,
        resolve_bucket: impl Fn(ItemHash) -> Option<BucketCategory>,
    ) -> Self {
        let components = &profile.response;
        let mut snapshot = AccountSnapshot::new();

        let character_ids = components
            .characters
            .as_ref()
            .and_then(|c| c.data.as_ref())
            .into_iter()
            .flat_map(|data| data.keys());
        for raw in character_ids {
            if let Some(id) = parse_character_id(raw) {
                snapshot.add_character(id);
            }
        }

        if let Some(equipment) = components
            .character_equipment
            .as_ref()
            .and_then(|c| c.data.as_ref())
        {
            for (raw, list) in equipment {
                let Some(character_id) = parse_character_id(raw) else {
                    continue;
                };
                snapshot.add_character(character_id.clone());
                for item in &list.items {
                    if let Some(previous) =
                        snapshot.set_equipped(character_id.clone(), item.to_item(&resolve_bucket))
                    {
                        tracing::warn!(
                            character_id = %character_id,
                            bucket = %previous.bucket,
                            "profile reports two equipped items in one slot; keeping the later one"
                        );
                    }
                }
            }
        }

        if let Some(inventories) = components
            .character_inventories
            .as_ref()
            .and_then(|c| c.data.as_ref())
        {
            for (raw, list) in inventories {
                let Some(character_id) = parse_character_id(raw) else {
                    continue;
                };
                snapshot.add_character(character_id.clone());
                for item in &list.items {
                    snapshot.push_inventory(character_id.clone(), item.to_item(&resolve_bucket));
                }
            }
        }

        if let Some(vault) = components
            .profile_inventory
            .as_ref()
            .and_then(|c| c.data.as_ref())
        {
            for item in &vault.items {
                snapshot.push_vault(item.to_item(&resolve_bucket));
            }
        }

        snapshot
    }
}

fn parse_character_id(raw: &str) -> Option<CharacterId> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::warn!(raw, error = %err, "skipping profile entry with malformed character id");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    const PROFILE: &str = r#"{
        "Response": {
            "characters": { "data": { "111": {"light": 1810}, "222": {"light": 1800} } },
            "characterEquipment": { "data": {
                "111": { "items": [
                    {"itemHash": 10, "itemInstanceId": "9001", "bucketHash": 3448274439},
                    {"itemHash": 11, "itemInstanceId": "9002", "bucketHash": 1498876634}
                ]}
            }},
            "characterInventories": { "data": {
                "111": { "items": [
                    {"itemHash": 12, "itemInstanceId": "9003", "bucketHash": 3448274439, "quantity": 1}
                ]},
                "oops": { "items": [
                    {"itemHash": 13, "itemInstanceId": "9999", "bucketHash": 3448274439}
                ]}
            }},
            "profileInventory": { "data": { "items": [
                {"itemHash": 14, "itemInstanceId": "9004", "bucketHash": 138197802},
                {"itemHash": 15, "bucketHash": 138197802, "quantity": 40}
            ]}}
        }
    }"#;

    fn parse() -> ProfileResponse {
        serde_json::from_str(PROFILE).unwrap()
    }

    #[test]
    fn decodes_equipment_inventory_and_vault() {
        let snapshot = AccountSnapshot::from_profile(&parse());
        let c111 = CharacterId::new("111");

        let helmet = snapshot.equipped(&c111, BucketCategory::Helmet).unwrap();
        assert_eq!(helmet.instance_id(), Some(&ItemInstanceId::new("9001")));
        assert_eq!(helmet.owner_character_id, Some(c111.clone()));
        assert!(snapshot.equipped(&c111, BucketCategory::KineticWeapon).is_some());

        assert_eq!(snapshot.inventory(&c111).len(), 1);
        assert_eq!(snapshot.vault().len(), 2);
        assert!(!snapshot.vault()[1].is_instanced());
    }

    #[test]
    fn characters_without_items_are_still_known() {
        let snapshot = AccountSnapshot::from_profile(&parse());
        assert!(snapshot.has_character(&CharacterId::new("222")));
        assert!(snapshot.inventory(&CharacterId::new("222")).is_empty());
    }

    #[test]
    fn malformed_character_ids_are_skipped() {
        let snapshot = AccountSnapshot::from_profile(&parse());
        assert!(snapshot.locate(&ItemInstanceId::new("9999")).is_none());
        assert_eq!(snapshot.character_ids().count(), 2);
    }

    #[test]
    fn resolver_overrides_reported_bucket() {
        let snapshot = AccountSnapshot::from_profile_with(&parse(), |hash| {
            (hash == ItemHash(14)).then_some(BucketCategory::PowerWeapon)
        });
        let (loc, item) = snapshot.locate(&ItemInstanceId::new("9004")).unwrap();
        assert_eq!(loc, Location::SharedPool);
        assert_eq!(item.bucket, BucketCategory::PowerWeapon);
    }

    #[test]
    fn missing_components_yield_an_empty_snapshot() {
        let profile: ProfileResponse = serde_json::from_str(r#"{"Response": {}}"#).unwrap();
        let snapshot = AccountSnapshot::from_profile(&profile);
        assert_eq!(snapshot.character_ids().count(), 0);
        assert!(snapshot.vault().is_empty());
    }
}
