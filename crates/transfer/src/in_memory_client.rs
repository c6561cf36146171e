//! In-memory Remote Mutation Client for tests/dev.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::{EquipArgs, EquipManyArgs, RemoteError, RemoteMutationClient, TransferArgs};
use crate::plan::StepKind;

/// A call received by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Transfer(TransferArgs),
    Equip(EquipArgs),
    EquipMany(EquipManyArgs),
}

impl RecordedCall {
    /// The plan step this call corresponds to; `None` for `EquipMany`.
    pub fn step_kind(&self) -> Option<StepKind> {
        match self {
            RecordedCall::Transfer(args) if args.to_shared_pool => Some(StepKind::TransferToPool),
            RecordedCall::Transfer(_) => Some(StepKind::TransferToCharacter),
            RecordedCall::Equip(_) => Some(StepKind::Equip),
            RecordedCall::EquipMany(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    in_flight: usize,
    max_in_flight: usize,
    fail_at: Option<usize>,
    delay: Option<Duration>,
}

/// Records every call, tracks how many were in flight at once, and can be
/// scripted to reject the n-th call.
///
/// - No IO
/// - Clones share the same recording
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    state: Arc<Mutex<State>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the call with zero-based index `call_index`; all others succeed.
    pub fn failing_at(call_index: usize) -> Self {
        let client = Self::new();
        client.lock().fail_at = Some(call_index);
        client
    }

    /// Hold every call open for `delay` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.lock().delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Highest number of calls that were in flight simultaneously.
    pub fn max_concurrency(&self) -> usize {
        self.lock().max_in_flight
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, call: RecordedCall) -> Result<(), RemoteError> {
        let (index, delay) = {
            let mut state = self.lock();
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            state.calls.push(call);
            (state.calls.len() - 1, state.delay)
        };

        // Give any concurrently issued call a chance to overlap.
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        let mut state = self.lock();
        state.in_flight -= 1;
        if state.fail_at == Some(index) {
            return Err(RemoteError::Rejected(format!("scripted failure of call {index}")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteMutationClient for RecordingClient {
    async fn transfer(&self, args: TransferArgs) -> Result<(), RemoteError> {
        self.record(RecordedCall::Transfer(args)).await
    }

    async fn equip(&self, args: EquipArgs) -> Result<(), RemoteError> {
        self.record(RecordedCall::Equip(args)).await
    }

    async fn equip_many(&self, args: EquipManyArgs) -> Result<(), RemoteError> {
        self.record(RecordedCall::EquipMany(args)).await
    }
}
