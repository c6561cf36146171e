//! `vaultops-core` — foundation building blocks shared by every vaultops crate.
//!
//! This crate contains **pure domain** primitives (no IO, no async).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{BucketHash, CharacterId, ItemHash, ItemInstanceId, MembershipId};
pub use value_object::ValueObject;
