//! Remote Mutation Client: the three calls the account service exposes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vaultops_core::{CharacterId, ItemHash, ItemInstanceId};
use vaultops_inventory::Item;

/// Arguments of a single transfer between a character and the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferArgs {
    /// Absent for non-instanced stackables.
    pub item_id: Option<ItemInstanceId>,
    pub item_template_hash: ItemHash,
    pub character_id: CharacterId,
    /// `true` moves character → vault, `false` vault → character.
    pub to_shared_pool: bool,
}

impl TransferArgs {
    pub fn for_item(item: &Item, character_id: &CharacterId, to_shared_pool: bool) -> Self {
        Self {
            item_id: item.item_instance_id.clone(),
            item_template_hash: item.item_hash,
            character_id: character_id.clone(),
            to_shared_pool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipArgs {
    pub item_id: ItemInstanceId,
    pub character_id: CharacterId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipManyArgs {
    pub item_ids: Vec<ItemInstanceId>,
    pub character_id: CharacterId,
}

/// Opaque failure of one remote call.
///
/// The orchestrator only distinguishes success from failure; the variants are
/// for the humans reading the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),
    #[error("service error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Each call is one network request that either succeeds or fails.
///
/// None of the calls are assumed idempotent. Timeouts are the
/// implementation's responsibility.
#[async_trait]
pub trait RemoteMutationClient: Send + Sync {
    async fn transfer(&self, args: TransferArgs) -> Result<(), RemoteError>;

    async fn equip(&self, args: EquipArgs) -> Result<(), RemoteError>;

    /// Bulk equip used by loadouts; never part of a per-item plan.
    async fn equip_many(&self, args: EquipManyArgs) -> Result<(), RemoteError>;
}
