//! `vaultops-transfer` — transfer/equip orchestration.
//!
//! Given an item, where it is and where it was dropped, this crate decides the
//! ordered remote mutations that move it ([`plan`]), runs them one at a time
//! against a [`RemoteMutationClient`] ([`execute`]), and serializes whole runs
//! so at most one plan is in flight ([`TransferOrchestrator`]).
//!
//! Planning refusals are values ([`Refusal`]); execution failures are errors
//! ([`TransferError`]) naming the step that failed. Plans are not
//! transactional: steps before the failed one stay applied.

pub mod client;
pub mod execute;
pub mod in_memory_client;
pub mod loadout;
pub mod notice;
pub mod orchestrator;
pub mod plan;
pub mod request;
pub mod session;

pub use client::{EquipArgs, EquipManyArgs, RemoteError, RemoteMutationClient, TransferArgs};
pub use execute::{TransferError, execute};
pub use in_memory_client::{RecordedCall, RecordingClient};
pub use loadout::{LoadoutError, LoadoutPlan, execute_loadout, plan_loadout};
pub use notice::{Notice, NoticeLevel, describe_step};
pub use orchestrator::{NoRefresh, SnapshotRefresher, TransferOrchestrator, TransferOutcome};
pub use plan::{Refusal, RemoteOp, StepKind, TransferPlan, TransferPlanner, plan};
pub use request::TransferRequest;
pub use session::{DragError, DragSession, DragState, DropOwner, DropTarget, DropZone};
