//! Bucket categories (the slot type an item occupies).

use serde::{Deserialize, Serialize};

use vaultops_core::{BucketHash, ValueObject};

pub const KINETIC_WEAPON: BucketHash = BucketHash(1498876634);
pub const ENERGY_WEAPON: BucketHash = BucketHash(2465295065);
pub const POWER_WEAPON: BucketHash = BucketHash(953998645);
pub const GHOST: BucketHash = BucketHash(4023194814);
pub const HELMET: BucketHash = BucketHash(3448274439);
pub const GAUNTLETS: BucketHash = BucketHash(3551918588);
pub const CHEST_ARMOR: BucketHash = BucketHash(14239492);
pub const LEG_ARMOR: BucketHash = BucketHash(20886954);
pub const CLASS_ARMOR: BucketHash = BucketHash(1585787867);
pub const SUBCLASS: BucketHash = BucketHash(3284755031);
/// Bucket reported for everything sitting in the vault.
pub const GENERAL: BucketHash = BucketHash(138197802);

/// Slot category of an item.
///
/// Serialized as the raw bucket hash. Always build from a hash through
/// [`BucketCategory::from_hash`] so known hashes never end up in `Other`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "BucketHash", into = "BucketHash")]
pub enum BucketCategory {
    KineticWeapon,
    EnergyWeapon,
    PowerWeapon,
    Ghost,
    Helmet,
    Gauntlets,
    ChestArmor,
    LegArmor,
    ClassArmor,
    Subclass,
    General,
    Other(BucketHash),
}

impl BucketCategory {
    pub fn from_hash(hash: BucketHash) -> Self {
        match hash {
            KINETIC_WEAPON => Self::KineticWeapon,
            ENERGY_WEAPON => Self::EnergyWeapon,
            POWER_WEAPON => Self::PowerWeapon,
            GHOST => Self::Ghost,
            HELMET => Self::Helmet,
            GAUNTLETS => Self::Gauntlets,
            CHEST_ARMOR => Self::ChestArmor,
            LEG_ARMOR => Self::LegArmor,
            CLASS_ARMOR => Self::ClassArmor,
            SUBCLASS => Self::Subclass,
            GENERAL => Self::General,
            other => Self::Other(other),
        }
    }

    pub fn hash(self) -> BucketHash {
        match self {
            Self::KineticWeapon => KINETIC_WEAPON,
            Self::EnergyWeapon => ENERGY_WEAPON,
            Self::PowerWeapon => POWER_WEAPON,
            Self::Ghost => GHOST,
            Self::Helmet => HELMET,
            Self::Gauntlets => GAUNTLETS,
            Self::ChestArmor => CHEST_ARMOR,
            Self::LegArmor => LEG_ARMOR,
            Self::ClassArmor => CLASS_ARMOR,
            Self::Subclass => SUBCLASS,
            Self::General => GENERAL,
            Self::Other(h) => h,
        }
    }

    pub fn is_weapon(self) -> bool {
        matches!(
            self,
            Self::KineticWeapon | Self::EnergyWeapon | Self::PowerWeapon
        )
    }

    pub fn is_armor(self) -> bool {
        matches!(
            self,
            Self::Helmet | Self::Gauntlets | Self::ChestArmor | Self::LegArmor | Self::ClassArmor
        )
    }

    /// Whether a character has an equipment slot for this bucket.
    pub fn is_equippable(self) -> bool {
        self.is_weapon() || self.is_armor() || matches!(self, Self::Ghost | Self::Subclass)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::KineticWeapon => "Kinetic Weapon",
            Self::EnergyWeapon => "Energy Weapon",
            Self::PowerWeapon => "Power Weapon",
            Self::Ghost => "Ghost",
            Self::Helmet => "Helmet",
            Self::Gauntlets => "Gauntlets",
            Self::ChestArmor => "Chest Armor",
            Self::LegArmor => "Leg Armor",
            Self::ClassArmor => "Class Armor",
            Self::Subclass => "Subclass",
            Self::General => "General",
            Self::Other(_) => "Other",
        }
    }
}

impl From<BucketHash> for BucketCategory {
    fn from(value: BucketHash) -> Self {
        Self::from_hash(value)
    }
}

impl From<BucketCategory> for BucketHash {
    fn from(value: BucketCategory) -> Self {
        value.hash()
    }
}

impl core::fmt::Display for BucketCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Other(h) => write!(f, "bucket {h}"),
            known => f.write_str(known.name()),
        }
    }
}

impl ValueObject for BucketCategory {}
