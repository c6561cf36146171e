//! Transfer planning: which remote mutations move an item, in what order.
//!
//! The service only lets items cross between characters through the vault, so
//! every character-to-character move is `TransferToPool` then
//! `TransferToCharacter`. An equip on the destination is always the last step:
//! if anything before it fails the item is merely un-equipped, never equipped
//! somewhere it was not meant to go.

use serde::{Deserialize, Serialize};

use vaultops_core::{CharacterId, ItemHash, ValueObject};
use vaultops_inventory::{
    AccountSnapshot, BucketCategory, FirstInInventory, Item, Location, ReplacementSelector,
    same_location,
};

use crate::request::TransferRequest;

/// One remote mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RemoteOp {
    Equip {
        item: Item,
        character_id: CharacterId,
    },
    /// Move `item` from `character_id`'s inventory into the vault.
    TransferToPool {
        item: Item,
        character_id: CharacterId,
    },
    /// Move `item` from the vault into `character_id`'s inventory.
    TransferToCharacter {
        item: Item,
        character_id: CharacterId,
    },
}

impl RemoteOp {
    pub fn kind(&self) -> StepKind {
        match self {
            RemoteOp::Equip { .. } => StepKind::Equip,
            RemoteOp::TransferToPool { .. } => StepKind::TransferToPool,
            RemoteOp::TransferToCharacter { .. } => StepKind::TransferToCharacter,
        }
    }

    pub fn item(&self) -> &Item {
        match self {
            RemoteOp::Equip { item, .. }
            | RemoteOp::TransferToPool { item, .. }
            | RemoteOp::TransferToCharacter { item, .. } => item,
        }
    }

    pub fn character_id(&self) -> &CharacterId {
        match self {
            RemoteOp::Equip { character_id, .. }
            | RemoteOp::TransferToPool { character_id, .. }
            | RemoteOp::TransferToCharacter { character_id, .. } => character_id,
        }
    }
}

impl ValueObject for RemoteOp {}

/// Kind of a [`RemoteOp`], without its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Equip,
    TransferToPool,
    TransferToCharacter,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Equip => "Equip",
            StepKind::TransferToPool => "TransferToPool",
            StepKind::TransferToCharacter => "TransferToCharacter",
        }
    }
}

impl core::fmt::Display for StepKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered remote mutations for one request.
///
/// Executed in order and abandoned, not retried, at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlan {
    steps: Vec<RemoteOp>,
}

impl TransferPlan {
    /// Wrap an already-ordered list of steps.
    pub fn from_steps(steps: Vec<RemoteOp>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[RemoteOp] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemoteOp> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(RemoteOp::kind).collect()
    }

    pub fn into_steps(self) -> Vec<RemoteOp> {
        self.steps
    }

    pub(crate) fn extend(&mut self, other: TransferPlan) {
        self.steps.extend(other.steps);
    }
}

impl<'a> IntoIterator for &'a TransferPlan {
    type Item = &'a RemoteOp;
    type IntoIter = core::slice::Iter<'a, RemoteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Planning-time decision not to issue any remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    #[error("item is already there; no action needed")]
    NoActionNeeded,

    /// The item is equipped and nothing else of its bucket could take the slot.
    #[error("no replacement {bucket} in the inventory of character {character_id}")]
    NoReplacementAvailable {
        character_id: CharacterId,
        bucket: BucketCategory,
    },

    #[error("a {item_bucket} item cannot go into the {slot} slot")]
    SlotMismatch {
        item_bucket: BucketCategory,
        slot: BucketCategory,
    },

    #[error("item {item_hash} has no instance id and cannot be equipped")]
    NotInstanced { item_hash: ItemHash },
}

/// Computes [`TransferPlan`]s; replacement choice is delegated to `S`.
#[derive(Debug, Clone, Default)]
pub struct TransferPlanner<S = FirstInInventory> {
    selector: S,
}

impl TransferPlanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: ReplacementSelector> TransferPlanner<S> {
    pub fn with_selector(selector: S) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// Plan the remote mutations for `request`.
    ///
    /// Refusals are checked in this order: same location, source slot not
    /// matching the item's bucket, missing replacement for a vacated slot,
    /// equipment-to-equipment on one character, target slot not matching the
    /// item's bucket, equip of a non-instanced item.
    pub fn plan(
        &self,
        request: &TransferRequest,
        snapshot: &AccountSnapshot,
    ) -> Result<TransferPlan, Refusal> {
        let result = self.plan_steps(request, snapshot);
        match &result {
            Ok(plan) => tracing::debug!(
                source = %request.source,
                target = %request.target,
                item = %request.item,
                steps = plan.len(),
                "planned transfer"
            ),
            Err(refusal) => tracing::info!(
                source = %request.source,
                target = %request.target,
                item = %request.item,
                %refusal,
                "transfer refused"
            ),
        }
        result
    }

    fn plan_steps(
        &self,
        request: &TransferRequest,
        snapshot: &AccountSnapshot,
    ) -> Result<TransferPlan, Refusal> {
        let TransferRequest {
            item,
            source,
            target,
        } = request;

        if same_location(source, target) {
            return Err(Refusal::NoActionNeeded);
        }

        // A vacated slot must be refilled before anything else happens.
        let mut steps = Vec::new();
        if let Location::CharacterEquipment {
            character_id,
            bucket,
        } = source
        {
            if *bucket != item.bucket {
                return Err(Refusal::SlotMismatch {
                    item_bucket: item.bucket,
                    slot: *bucket,
                });
            }

            // A stale snapshot may still list the moving item in inventory.
            let replacement = self
                .selector
                .find_replacement(character_id, *bucket, item, snapshot)
                .filter(|candidate| !candidate.is_same_copy(item))
                .ok_or_else(|| Refusal::NoReplacementAvailable {
                    character_id: character_id.clone(),
                    bucket: *bucket,
                })?;

            if let Location::CharacterEquipment {
                character_id: target_character,
                ..
            } = target
            {
                if target_character == character_id {
                    return Err(Refusal::NoActionNeeded);
                }
            }

            steps.push(RemoteOp::Equip {
                item: replacement.clone(),
                character_id: character_id.clone(),
            });
        }

        if let Location::CharacterEquipment { bucket: slot, .. } = target {
            if *slot != item.bucket {
                return Err(Refusal::SlotMismatch {
                    item_bucket: item.bucket,
                    slot: *slot,
                });
            }
        }

        match (source.character_id(), target) {
            // Same character, equipped to inventory: the replacement equip is the whole move.
            (Some(from), Location::CharacterInventory { character_id: to }) if from == to => {}

            (Some(from), Location::CharacterEquipment { character_id: to, .. }) if from == to => {
                steps.push(equip(item, to));
            }

            (Some(from), Location::CharacterEquipment { character_id: to, .. }) => {
                route_between_characters(&mut steps, item, from, to);
                steps.push(equip(item, to));
            }

            (Some(from), Location::CharacterInventory { character_id: to }) => {
                route_between_characters(&mut steps, item, from, to);
            }

            (Some(from), Location::SharedPool) => {
                steps.push(RemoteOp::TransferToPool {
                    item: item.clone(),
                    character_id: from.clone(),
                });
            }

            (None, Location::CharacterEquipment { character_id: to, .. }) => {
                steps.push(RemoteOp::TransferToCharacter {
                    item: item.clone(),
                    character_id: to.clone(),
                });
                steps.push(equip(item, to));
            }

            (None, Location::CharacterInventory { character_id: to }) => {
                steps.push(RemoteOp::TransferToCharacter {
                    item: item.clone(),
                    character_id: to.clone(),
                });
            }

            (None, Location::SharedPool) => return Err(Refusal::NoActionNeeded),
        }

        if let Some(step) = steps
            .iter()
            .find(|step| step.kind() == StepKind::Equip && !step.item().is_instanced())
        {
            return Err(Refusal::NotInstanced {
                item_hash: step.item().item_hash,
            });
        }

        Ok(TransferPlan::from_steps(steps))
    }
}

/// Plan with the default replacement policy ([`FirstInInventory`]).
pub fn plan(request: &TransferRequest, snapshot: &AccountSnapshot) -> Result<TransferPlan, Refusal> {
    TransferPlanner::new().plan(request, snapshot)
}

fn equip(item: &Item, character_id: &CharacterId) -> RemoteOp {
    RemoteOp::Equip {
        item: item.clone(),
        character_id: character_id.clone(),
    }
}

fn route_between_characters(
    steps: &mut Vec<RemoteOp>,
    item: &Item,
    from: &CharacterId,
    to: &CharacterId,
) {
    steps.push(RemoteOp::TransferToPool {
        item: item.clone(),
        character_id: from.clone(),
    });
    steps.push(RemoteOp::TransferToCharacter {
        item: item.clone(),
        character_id: to.clone(),
    });
}
