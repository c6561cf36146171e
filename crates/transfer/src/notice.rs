//! User-facing messages for transfer outcomes.

use serde::Serialize;

use crate::orchestrator::TransferOutcome;
use crate::plan::{Refusal, RemoteOp};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    /// Nothing was sent.
    Blocked,
    /// Something was sent and failed.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            level,
            message: message.into(),
            detail,
        }
    }

    pub fn from_outcome(outcome: &TransferOutcome) -> Self {
        match outcome {
            TransferOutcome::Completed(plan) => {
                let detail = plan.iter().map(describe_step).collect::<Vec<_>>().join("; ");
                Self::new(
                    NoticeLevel::Success,
                    "Item moved successfully",
                    (!detail.is_empty()).then_some(detail),
                )
            }
            TransferOutcome::Refused(refusal) => Self::from_refusal(refusal),
            TransferOutcome::Failed(err) => Self::new(
                NoticeLevel::Error,
                "Failed to move item",
                Some(format!(
                    "step {} of the move ({}) failed: {}; {} earlier step(s) stay applied",
                    err.step_index + 1,
                    err.step_kind,
                    err.cause,
                    err.applied_steps()
                )),
            ),
            TransferOutcome::Busy => Self::new(
                NoticeLevel::Blocked,
                "Another move is still in progress",
                None,
            ),
        }
    }

    pub fn from_refusal(refusal: &Refusal) -> Self {
        let message = match refusal {
            Refusal::NoActionNeeded => "Item dropped in the same location, no action needed",
            Refusal::NoReplacementAvailable { .. } => "No suitable replacement found",
            Refusal::SlotMismatch { .. } => "Item does not fit that slot",
            Refusal::NotInstanced { .. } => "Item cannot be equipped",
        };
        let detail = match refusal {
            Refusal::NoActionNeeded => None,
            other => Some(other.to_string()),
        };
        Self::new(NoticeLevel::Blocked, message, detail)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl core::fmt::Display for Notice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Past-tense description of one applied step.
pub fn describe_step(step: &RemoteOp) -> String {
    match step {
        RemoteOp::Equip { item, character_id } => {
            format!("Equipped {item} on character {character_id}")
        }
        RemoteOp::TransferToPool { item, .. } => format!("Transferred {item} to vault"),
        RemoteOp::TransferToCharacter { item, character_id } => {
            format!("Transferred {item} to the inventory of character {character_id}")
        }
    }
}
