//! Location model: the three kinds of place an item can sit.

use serde::{Deserialize, Serialize};

use vaultops_core::{CharacterId, ValueObject};

use crate::bucket::BucketCategory;

/// Where an item sits.
///
/// At most one item occupies a given `CharacterEquipment { character_id, bucket }`
/// pair at any time. Inventory and shared pool are unordered and
/// capacity-bounded by the service; capacity is observed, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    CharacterEquipment {
        character_id: CharacterId,
        bucket: BucketCategory,
    },
    CharacterInventory {
        character_id: CharacterId,
    },
    /// Account-wide pool ("vault"), not owned by any character.
    SharedPool,
}

impl Location {
    pub fn equipment(character_id: CharacterId, bucket: BucketCategory) -> Self {
        Self::CharacterEquipment {
            character_id,
            bucket,
        }
    }

    pub fn inventory(character_id: CharacterId) -> Self {
        Self::CharacterInventory { character_id }
    }

    /// Owning character, `None` for the shared pool.
    pub fn character_id(&self) -> Option<&CharacterId> {
        match self {
            Self::CharacterEquipment { character_id, .. }
            | Self::CharacterInventory { character_id } => Some(character_id),
            Self::SharedPool => None,
        }
    }

    pub fn is_shared_pool(&self) -> bool {
        matches!(self, Self::SharedPool)
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CharacterEquipment {
                character_id,
                bucket,
            } => write!(f, "{bucket} slot of character {character_id}"),
            Self::CharacterInventory { character_id } => {
                write!(f, "inventory of character {character_id}")
            }
            Self::SharedPool => f.write_str("vault"),
        }
    }
}

impl ValueObject for Location {}

/// Two locations are equal iff same variant and same character/bucket fields.
/// Shared pools are always equal to each other.
pub fn same_location(a: &Location, b: &Location) -> bool {
    a == b
}

pub fn is_equipment_slot(loc: &Location) -> bool {
    matches!(loc, Location::CharacterEquipment { .. })
}
