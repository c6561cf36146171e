//! Sequential execution of a [`TransferPlan`].

use tracing::Instrument;
use uuid::Uuid;

use crate::client::{EquipArgs, RemoteError, RemoteMutationClient, TransferArgs};
use crate::plan::{RemoteOp, StepKind, TransferPlan};

/// A remote call inside an otherwise valid plan failed.
///
/// Steps before `step_index` have already taken effect and are not rolled back;
/// steps after it were never issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("step {step_index} ({step_kind}) failed: {cause}")]
pub struct TransferError {
    /// Zero-based position of the failed step in the plan.
    pub step_index: usize,
    pub step_kind: StepKind,
    #[source]
    pub cause: RemoteError,
}

impl TransferError {
    /// Number of steps that were applied before the failure.
    pub fn applied_steps(&self) -> usize {
        self.step_index
    }
}

/// Run every step of `plan` in order, awaiting each before issuing the next.
///
/// Stops at the first failing step. There is no retry and no rollback.
pub async fn execute<C>(client: &C, plan: &TransferPlan) -> Result<(), TransferError>
where
    C: RemoteMutationClient + ?Sized,
{
    let plan_id = Uuid::now_v7();
    let span = tracing::info_span!("transfer_plan", %plan_id, steps = plan.len());

    async move {
        tracing::info!("executing transfer plan");

        for (step_index, step) in plan.iter().enumerate() {
            let step_kind = step.kind();
            let result = run_step(client, step)
                .instrument(tracing::debug_span!("remote_step", index = step_index, kind = %step_kind))
                .await;

            if let Err(cause) = result {
                tracing::warn!(
                    step_index,
                    %step_kind,
                    item = %step.item(),
                    error = %cause,
                    "transfer step failed; earlier steps stay applied"
                );
                return Err(TransferError {
                    step_index,
                    step_kind,
                    cause,
                });
            }
        }

        tracing::info!("transfer plan committed");
        Ok(())
    }
    .instrument(span)
    .await
}

async fn run_step<C>(client: &C, step: &RemoteOp) -> Result<(), RemoteError>
where
    C: RemoteMutationClient + ?Sized,
{
    tracing::debug!(item = %step.item(), character_id = %step.character_id(), "issuing remote call");

    match step {
        RemoteOp::Equip { item, character_id } => {
            let item_id = item
                .require_instance_id()
                .map_err(|e| RemoteError::Rejected(e.to_string()))?
                .clone();
            client
                .equip(EquipArgs {
                    item_id,
                    character_id: character_id.clone(),
                })
                .await
        }
        RemoteOp::TransferToPool { item, character_id } => {
            client
                .transfer(TransferArgs::for_item(item, character_id, true))
                .await
        }
        RemoteOp::TransferToCharacter { item, character_id } => {
            client
                .transfer(TransferArgs::for_item(item, character_id, false))
                .await
        }
    }
}
