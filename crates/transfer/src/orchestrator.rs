//! Serialized plan-then-execute entry point.
//!
//! Nothing in the planner stops two plans touching the same slots from
//! interleaving, and the replacement choice is only as good as the snapshot it
//! read. The orchestrator therefore lets at most one plan execute at a time and
//! asks the caller to refresh its snapshot after every run.

use async_trait::async_trait;
use tokio::sync::Mutex;

use vaultops_inventory::{AccountSnapshot, FirstInInventory, ReplacementSelector};

use crate::client::RemoteMutationClient;
use crate::execute::{TransferError, execute};
use crate::plan::{Refusal, TransferPlan, TransferPlanner};
use crate::request::TransferRequest;

/// Caller-owned cache of the account snapshot.
#[async_trait]
pub trait SnapshotRefresher: Send + Sync {
    /// Called after every executed plan, successful or not: a failed plan may
    /// still have applied some of its steps.
    async fn invalidate(&self);
}

/// Refresher for callers that re-read the account themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRefresh;

#[async_trait]
impl SnapshotRefresher for NoRefresh {
    async fn invalidate(&self) {}
}

/// Result of submitting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Every step succeeded.
    Completed(TransferPlan),
    /// Blocked before any remote call.
    Refused(Refusal),
    /// Failed partway; earlier steps stay applied.
    Failed(TransferError),
    /// Another plan was executing; nothing was planned or sent.
    Busy,
}

impl TransferOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed(_))
    }

    /// Whether any remote call may have taken effect.
    pub fn touched_remote(&self) -> bool {
        matches!(
            self,
            TransferOutcome::Completed(_) | TransferOutcome::Failed(_)
        )
    }
}

pub struct TransferOrchestrator<C, S = FirstInInventory, R = NoRefresh> {
    client: C,
    planner: TransferPlanner<S>,
    refresher: R,
    in_flight: Mutex<()>,
}

impl<C: RemoteMutationClient> TransferOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            planner: TransferPlanner::new(),
            refresher: NoRefresh,
            in_flight: Mutex::new(()),
        }
    }
}

impl<C, S, R> TransferOrchestrator<C, S, R>
where
    C: RemoteMutationClient,
    S: ReplacementSelector + Send + Sync,
    R: SnapshotRefresher,
{
    pub fn with_selector<S2>(self, selector: S2) -> TransferOrchestrator<C, S2, R>
    where
        S2: ReplacementSelector + Send + Sync,
    {
        TransferOrchestrator {
            client: self.client,
            planner: TransferPlanner::with_selector(selector),
            refresher: self.refresher,
            in_flight: self.in_flight,
        }
    }

    pub fn with_refresher<R2: SnapshotRefresher>(self, refresher: R2) -> TransferOrchestrator<C, S, R2> {
        TransferOrchestrator {
            client: self.client,
            planner: self.planner,
            refresher,
            in_flight: self.in_flight,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn planner(&self) -> &TransferPlanner<S> {
        &self.planner
    }

    /// Whether a plan is currently executing.
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Plan and execute `request`, waiting for any running plan to finish first.
    ///
    /// `snapshot` is read when this call's turn comes; callers queueing behind
    /// another plan should pass a snapshot taken after that plan, or use
    /// [`TransferOrchestrator::try_submit`].
    pub async fn submit(&self, request: &TransferRequest, snapshot: &AccountSnapshot) -> TransferOutcome {
        let _guard = self.in_flight.lock().await;
        self.run(request, snapshot).await
    }

    /// Like [`TransferOrchestrator::submit`], but returns [`TransferOutcome::Busy`]
    /// instead of waiting.
    pub async fn try_submit(&self, request: &TransferRequest, snapshot: &AccountSnapshot) -> TransferOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!(item = %request.item, "transfer rejected: another plan is in flight");
            return TransferOutcome::Busy;
        };
        self.run(request, snapshot).await
    }

    async fn run(&self, request: &TransferRequest, snapshot: &AccountSnapshot) -> TransferOutcome {
        let plan = match self.planner.plan(request, snapshot) {
            Ok(plan) => plan,
            Err(refusal) => return TransferOutcome::Refused(refusal),
        };

        let outcome = match execute(&self.client, &plan).await {
            Ok(()) => TransferOutcome::Completed(plan),
            Err(err) => TransferOutcome::Failed(err),
        };

        self.refresher.invalidate().await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::in_memory_client::RecordingClient;
    use crate::plan::StepKind;
    use vaultops_core::{CharacterId, ItemHash, ItemInstanceId};
    use vaultops_inventory::{BucketCategory, Item, Location};

    #[derive(Clone, Default)]
    struct CountingRefresher(Arc<AtomicUsize>);

    #[async_trait]
    impl SnapshotRefresher for CountingRefresher {
        async fn invalidate(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn a() -> CharacterId {
        CharacterId::new("1")
    }

    fn b() -> CharacterId {
        CharacterId::new("2")
    }

    fn gun(instance: &str) -> Item {
        Item::instanced(
            ItemHash(11),
            ItemInstanceId::new(instance),
            BucketCategory::PowerWeapon,
        )
    }

    fn inventory_to_vault() -> TransferRequest {
        TransferRequest::new(gun("7"), Location::inventory(a()), Location::SharedPool)
    }

    #[tokio::test]
    async fn completed_plan_refreshes_the_snapshot() {
        let refresher = CountingRefresher::default();
        let orchestrator =
            TransferOrchestrator::new(RecordingClient::new()).with_refresher(refresher.clone());

        let outcome = orchestrator
            .submit(&inventory_to_vault(), &AccountSnapshot::new())
            .await;

        assert!(outcome.is_completed());
        assert_eq!(orchestrator.client().call_count(), 1);
        assert_eq!(refresher.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refusal_issues_no_calls_and_no_refresh() {
        let refresher = CountingRefresher::default();
        let orchestrator =
            TransferOrchestrator::new(RecordingClient::new()).with_refresher(refresher.clone());
        let request = TransferRequest::new(
            gun("7"),
            Location::equipment(a(), BucketCategory::PowerWeapon),
            Location::SharedPool,
        );

        let outcome = orchestrator.submit(&request, &AccountSnapshot::new()).await;

        assert!(matches!(
            outcome,
            TransferOutcome::Refused(Refusal::NoReplacementAvailable { .. })
        ));
        assert!(!outcome.touched_remote());
        assert_eq!(orchestrator.client().call_count(), 0);
        assert_eq!(refresher.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_plan_still_refreshes() {
        let refresher = CountingRefresher::default();
        let orchestrator =
            TransferOrchestrator::new(RecordingClient::failing_at(1)).with_refresher(refresher.clone());
        let request = TransferRequest::new(gun("7"), Location::inventory(a()), Location::inventory(b()));

        let outcome = orchestrator.submit(&request, &AccountSnapshot::new()).await;

        match outcome {
            TransferOutcome::Failed(err) => {
                assert_eq!(err.step_index, 1);
                assert_eq!(err.step_kind, StepKind::TransferToCharacter);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(refresher.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn try_submit_is_busy_while_a_plan_runs() {
        let client = RecordingClient::new().with_delay(Duration::from_millis(50));
        let orchestrator = Arc::new(TransferOrchestrator::new(client.clone()));

        let running = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                orchestrator
                    .submit(&inventory_to_vault(), &AccountSnapshot::new())
                    .await
            })
        };

        while client.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(orchestrator.is_busy());

        let second = TransferRequest::new(gun("8"), Location::inventory(a()), Location::SharedPool);
        let outcome = orchestrator.try_submit(&second, &AccountSnapshot::new()).await;
        assert_eq!(outcome, TransferOutcome::Busy);

        assert!(running.await.unwrap().is_completed());
        assert!(!orchestrator.is_busy());
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn queued_submissions_never_overlap() {
        let client = RecordingClient::new();
        let orchestrator = TransferOrchestrator::new(client.clone());
        let first = TransferRequest::new(gun("7"), Location::inventory(a()), Location::inventory(b()));
        let second = TransferRequest::new(gun("8"), Location::SharedPool, Location::inventory(a()));
        let snapshot = AccountSnapshot::new();

        let (o1, o2) = tokio::join!(
            orchestrator.submit(&first, &snapshot),
            orchestrator.submit(&second, &snapshot)
        );

        assert!(o1.is_completed() && o2.is_completed());
        assert_eq!(client.call_count(), 3);
        assert_eq!(client.max_concurrency(), 1);
    }
}
