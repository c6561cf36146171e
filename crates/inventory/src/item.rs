use serde::{Deserialize, Serialize};

use vaultops_core::{CharacterId, DomainError, DomainResult, ItemHash, ItemInstanceId};

use crate::bucket::BucketCategory;

/// One owned unit of equipment, weapon or cosmetic.
///
/// Items are created and destroyed by the remote service; this system only
/// observes them and requests moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Catalog/template id shared by every copy of the same kind.
    pub item_hash: ItemHash,
    /// Unique id of this copy; absent for non-instanced stackables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_instance_id: Option<ItemInstanceId>,
    #[serde(rename = "bucketHash")]
    pub bucket: BucketCategory,
    /// Present only while the item sits in a character-scoped location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_character_id: Option<CharacterId>,
}

impl Item {
    pub fn instanced(
        item_hash: ItemHash,
        instance_id: ItemInstanceId,
        bucket: BucketCategory,
    ) -> Self {
        Self {
            item_hash,
            item_instance_id: Some(instance_id),
            bucket,
            owner_character_id: None,
        }
    }

    pub fn stackable(item_hash: ItemHash, bucket: BucketCategory) -> Self {
        Self {
            item_hash,
            item_instance_id: None,
            bucket,
            owner_character_id: None,
        }
    }

    pub fn owned_by(mut self, character_id: CharacterId) -> Self {
        self.owner_character_id = Some(character_id);
        self
    }

    pub fn unowned(mut self) -> Self {
        self.owner_character_id = None;
        self
    }

    pub fn instance_id(&self) -> Option<&ItemInstanceId> {
        self.item_instance_id.as_ref()
    }

    pub fn is_instanced(&self) -> bool {
        self.item_instance_id.is_some()
    }

    /// Instance id, or an error naming the item when it has none.
    pub fn require_instance_id(&self) -> DomainResult<&ItemInstanceId> {
        self.item_instance_id.as_ref().ok_or_else(|| {
            DomainError::validation(format!("item {} has no instance id", self.item_hash))
        })
    }

    /// Whether `other` is the same owned copy.
    ///
    /// Instanced items compare by instance id; stackables by catalog hash.
    pub fn is_same_copy(&self, other: &Item) -> bool {
        match (&self.item_instance_id, &other.item_instance_id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.item_hash == other.item_hash,
            _ => false,
        }
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.item_instance_id {
            Some(id) => write!(f, "item {} ({})", id, self.item_hash),
            None => write!(f, "item {}", self.item_hash),
        }
    }
}
