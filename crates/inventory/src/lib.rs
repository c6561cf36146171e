//! Inventory domain module: where items live and what a snapshot of the
//! account looks like.
//!
//! Pure, deterministic logic only (no IO, no HTTP). The snapshot is a
//! read-only view handed in by the caller; nothing here mutates remote state.

pub mod bucket;
pub mod item;
pub mod location;
pub mod profile;
pub mod replacement;
pub mod snapshot;

pub use bucket::BucketCategory;
pub use item::Item;
pub use location::{Location, is_equipment_slot, same_location};
pub use profile::{ProfileItem, ProfileResponse};
pub use replacement::{FirstInInventory, ReplacementSelector, find_replacement};
pub use snapshot::{AccountSnapshot, CharacterState};
