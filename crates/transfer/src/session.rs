//! Drag-and-drop adapter.
//!
//! Turns "this item was picked up here and dropped there" into exactly one
//! [`TransferRequest`], and refuses to start a new drag while the previous
//! drop's plan is still executing.

use std::str::FromStr;

use vaultops_core::{CharacterId, DomainError};
use vaultops_inventory::{AccountSnapshot, Item, Location, ReplacementSelector};

use crate::client::RemoteMutationClient;
use crate::orchestrator::{SnapshotRefresher, TransferOrchestrator, TransferOutcome};
use crate::request::TransferRequest;

/// Drop area names as the account service spells them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DropZone {
    CharacterEquipment,
    CharacterInventory,
    ProfileInventory,
}

impl DropZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropZone::CharacterEquipment => "CharacterEquipment",
            DropZone::CharacterInventory => "CharacterInventory",
            DropZone::ProfileInventory => "ProfileInventory",
        }
    }
}

impl FromStr for DropZone {
    type Err = DragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CharacterEquipment" => Ok(DropZone::CharacterEquipment),
            "CharacterInventory" => Ok(DropZone::CharacterInventory),
            "ProfileInventory" => Ok(DropZone::ProfileInventory),
            other => Err(DragError::InvalidTarget(format!("unknown drop zone {other:?}"))),
        }
    }
}

impl core::fmt::Display for DropZone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whose area the item was dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropOwner {
    Vault,
    Character(CharacterId),
}

impl FromStr for DropOwner {
    type Err = DragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("vault") {
            return Ok(DropOwner::Vault);
        }
        s.parse::<CharacterId>()
            .map(DropOwner::Character)
            .map_err(|err: DomainError| DragError::InvalidTarget(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DropTarget {
    pub owner: DropOwner,
    pub zone: DropZone,
}

impl DropTarget {
    pub fn new(owner: DropOwner, zone: DropZone) -> Self {
        Self { owner, zone }
    }

    /// Parse an owner (`"vault"` or a character id) and a zone name.
    pub fn parse(owner: &str, zone: &str) -> Result<Self, DragError> {
        Ok(Self::new(owner.parse()?, zone.parse()?))
    }

    /// The location the dragged `item` would end up in.
    ///
    /// Equipment drops target the item's own bucket; the shared pool has no
    /// per-character zones, so anything dropped on the vault lands there.
    pub fn resolve(&self, item: &Item) -> Result<Location, DragError> {
        match (&self.owner, self.zone) {
            (DropOwner::Vault, _) | (_, DropZone::ProfileInventory) => Ok(Location::SharedPool),
            (DropOwner::Character(character_id), DropZone::CharacterEquipment) => {
                if !item.bucket.is_equippable() {
                    return Err(DragError::InvalidTarget(format!(
                        "{item} ({}) has no equipment slot",
                        item.bucket
                    )));
                }
                Ok(Location::equipment(character_id.clone(), item.bucket))
            }
            (DropOwner::Character(character_id), DropZone::CharacterInventory) => {
                Ok(Location::inventory(character_id.clone()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    #[error("a transfer is still in progress")]
    TransferInFlight,
    #[error("an item is already being dragged")]
    AlreadyDragging,
    #[error("nothing is being dragged")]
    NotDragging,
    #[error("invalid drop target: {0}")]
    InvalidTarget(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        item: Item,
        source: Location,
    },
    /// A dropped item's plan is executing.
    Locked,
}

/// `Idle → Dragging → Locked → Idle`, with `cancel` returning a drag to `Idle`.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == DragState::Locked
    }

    pub fn begin(&mut self, item: Item, source: Location) -> Result<(), DragError> {
        match self.state {
            DragState::Idle => {
                tracing::debug!(%item, %source, "drag started");
                self.state = DragState::Dragging { item, source };
                Ok(())
            }
            DragState::Dragging { .. } => Err(DragError::AlreadyDragging),
            DragState::Locked => Err(DragError::TransferInFlight),
        }
    }

    /// Abandon the current drag. No-op unless dragging.
    pub fn cancel(&mut self) {
        if matches!(self.state, DragState::Dragging { .. }) {
            self.state = DragState::Idle;
        }
    }

    /// End the drag on `target` and lock the session until [`DragSession::release`].
    ///
    /// An unresolvable target ends the drag without locking.
    pub fn drop_on(&mut self, target: &DropTarget) -> Result<TransferRequest, DragError> {
        let (item, source) = match std::mem::take(&mut self.state) {
            DragState::Dragging { item, source } => (item, source),
            other => {
                let err = match other {
                    DragState::Locked => DragError::TransferInFlight,
                    _ => DragError::NotDragging,
                };
                self.state = other;
                return Err(err);
            }
        };

        let destination = target.resolve(&item)?;
        self.state = DragState::Locked;
        Ok(TransferRequest::new(item, source, destination))
    }

    /// Unlock after the dropped item's plan finished.
    pub fn release(&mut self) {
        if self.is_locked() {
            self.state = DragState::Idle;
        }
    }

    /// Drop on `target`, run the resulting request through `orchestrator`, and
    /// unlock once it finished.
    pub async fn run_drop<C, S, R>(
        &mut self,
        target: &DropTarget,
        orchestrator: &TransferOrchestrator<C, S, R>,
        snapshot: &AccountSnapshot,
    ) -> Result<TransferOutcome, DragError>
    where
        C: RemoteMutationClient,
        S: ReplacementSelector + Send + Sync,
        R: SnapshotRefresher,
    {
        let request = self.drop_on(target)?;
        let outcome = orchestrator.submit(&request, snapshot).await;
        self.release();
        Ok(outcome)
    }
}
