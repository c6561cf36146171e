//! Bulk "equip a whole loadout" flow.
//!
//! Every item is first brought into the target character's inventory through
//! the ordinary planner, then a single `equip_many` puts them all on.

use std::collections::BTreeMap;

use vaultops_core::{CharacterId, ItemInstanceId};
use vaultops_inventory::{AccountSnapshot, BucketCategory, Item, Location, ReplacementSelector};

use crate::client::{EquipManyArgs, RemoteError, RemoteMutationClient};
use crate::execute::{TransferError, execute};
use crate::plan::{Refusal, TransferPlan, TransferPlanner};
use crate::request::TransferRequest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadoutError {
    #[error("loadout is empty")]
    Empty,

    #[error("item {0} is not in the account snapshot")]
    NotFound(ItemInstanceId),

    #[error("items {first} and {second} both occupy the {bucket} slot")]
    DuplicateBucket {
        bucket: BucketCategory,
        first: ItemInstanceId,
        second: ItemInstanceId,
    },

    #[error("item {item} ({bucket}) cannot be equipped")]
    NotEquippable {
        item: ItemInstanceId,
        bucket: BucketCategory,
    },

    #[error("cannot bring item {item} to the character: {refusal}")]
    Staging {
        item: ItemInstanceId,
        refusal: Refusal,
    },

    #[error("staging failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("equip failed: {0}")]
    Equip(#[source] RemoteError),
}

/// Staging moves plus the final bulk equip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadoutPlan {
    pub character_id: CharacterId,
    /// Transfers bringing items into the character's inventory; may be empty.
    pub staging: TransferPlan,
    /// Every loadout item, in request order.
    pub item_ids: Vec<ItemInstanceId>,
}

/// Plan equipping `item_ids` on `character_id`.
///
/// Items already on the character (equipped or in inventory) need no staging.
/// Staging of each other item is planned against the same snapshot, so two
/// loadout items must not depend on each other's moves; distinct buckets
/// guarantee that for equipment slots.
pub fn plan_loadout<S: ReplacementSelector>(
    planner: &TransferPlanner<S>,
    character_id: &CharacterId,
    item_ids: &[ItemInstanceId],
    snapshot: &AccountSnapshot,
) -> Result<LoadoutPlan, LoadoutError> {
    if item_ids.is_empty() {
        return Err(LoadoutError::Empty);
    }

    let mut located: Vec<(Location, &Item, &ItemInstanceId)> = Vec::with_capacity(item_ids.len());
    let mut by_bucket: BTreeMap<BucketCategory, &ItemInstanceId> = BTreeMap::new();
    for id in item_ids {
        let (location, item) = snapshot
            .locate(id)
            .ok_or_else(|| LoadoutError::NotFound(id.clone()))?;

        if !item.bucket.is_equippable() {
            return Err(LoadoutError::NotEquippable {
                item: id.clone(),
                bucket: item.bucket,
            });
        }
        if let Some(first) = by_bucket.insert(item.bucket, id) {
            return Err(LoadoutError::DuplicateBucket {
                bucket: item.bucket,
                first: first.clone(),
                second: id.clone(),
            });
        }

        located.push((location, item, id));
    }

    let mut staging = TransferPlan::default();
    for (source, item, id) in located {
        if source.character_id() == Some(character_id) {
            continue;
        }

        let request = TransferRequest::new(item.clone(), source, Location::inventory(character_id.clone()));
        let steps = planner
            .plan(&request, snapshot)
            .map_err(|refusal| LoadoutError::Staging {
                item: id.clone(),
                refusal,
            })?;
        staging.extend(steps);
    }

    tracing::debug!(
        %character_id,
        items = item_ids.len(),
        staging_steps = staging.len(),
        "planned loadout"
    );

    Ok(LoadoutPlan {
        character_id: character_id.clone(),
        staging,
        item_ids: item_ids.to_vec(),
    })
}

/// Run the staging transfers, then one `equip_many` call.
///
/// Like [`execute`], nothing is rolled back: if the bulk equip fails the
/// staged items stay in the character's inventory.
pub async fn execute_loadout<C>(client: &C, plan: &LoadoutPlan) -> Result<(), LoadoutError>
where
    C: RemoteMutationClient + ?Sized,
{
    execute(client, &plan.staging).await?;

    client
        .equip_many(EquipManyArgs {
            item_ids: plan.item_ids.clone(),
            character_id: plan.character_id.clone(),
        })
        .await
        .map_err(|err| {
            tracing::warn!(character_id = %plan.character_id, error = %err, "bulk equip failed");
            LoadoutError::Equip(err)
        })?;

    tracing::info!(character_id = %plan.character_id, items = plan.item_ids.len(), "loadout equipped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory_client::{RecordedCall, RecordingClient};
    use crate::plan::StepKind;
    use vaultops_core::ItemHash;

    fn a() -> CharacterId {
        CharacterId::new("1")
    }

    fn b() -> CharacterId {
        CharacterId::new("2")
    }

    fn id(s: &str) -> ItemInstanceId {
        ItemInstanceId::new(s)
    }

    fn item(instance: &str, bucket: BucketCategory) -> Item {
        Item::instanced(ItemHash(instance.parse().unwrap()), id(instance), bucket)
    }

    fn snapshot() -> AccountSnapshot {
        AccountSnapshot::new()
            .with_equipped(a(), item("10", BucketCategory::Helmet))
            .with_inventory_item(a(), item("11", BucketCategory::KineticWeapon))
            .with_equipped(b(), item("20", BucketCategory::EnergyWeapon))
            .with_inventory_item(b(), item("21", BucketCategory::EnergyWeapon))
            .with_vault_item(item("30", BucketCategory::PowerWeapon))
            .with_vault_item(Item::stackable(ItemHash(5), BucketCategory::General))
            .with_vault_item(item("31", BucketCategory::General))
            .with_vault_item(item("32", BucketCategory::Helmet))
    }

    #[test]
    fn items_already_on_the_character_need_no_staging() {
        let plan = plan_loadout(&TransferPlanner::new(), &a(), &[id("10"), id("11")], &snapshot()).unwrap();

        assert!(plan.staging.is_empty());
        assert_eq!(plan.item_ids, vec![id("10"), id("11")]);
        assert_eq!(plan.character_id, a());
    }

    #[test]
    fn foreign_items_are_staged_through_the_planner() {
        let plan = plan_loadout(&TransferPlanner::new(), &a(), &[id("20"), id("30")], &snapshot()).unwrap();

        assert_eq!(
            plan.staging.kinds(),
            vec![
                // 20 is equipped on B: refill B's slot, route via the vault.
                StepKind::Equip,
                StepKind::TransferToPool,
                StepKind::TransferToCharacter,
                // 30 sits in the vault.
                StepKind::TransferToCharacter,
            ]
        );
    }

    #[test]
    fn rejects_bad_loadouts() {
        let planner = TransferPlanner::new();
        let snap = snapshot();

        assert_eq!(plan_loadout(&planner, &a(), &[], &snap), Err(LoadoutError::Empty));
        assert_eq!(
            plan_loadout(&planner, &a(), &[id("99")], &snap),
            Err(LoadoutError::NotFound(id("99")))
        );
        assert_eq!(
            plan_loadout(&planner, &a(), &[id("10"), id("32")], &snap),
            Err(LoadoutError::DuplicateBucket {
                bucket: BucketCategory::Helmet,
                first: id("10"),
                second: id("32"),
            })
        );
        assert_eq!(
            plan_loadout(&planner, &a(), &[id("31")], &snap),
            Err(LoadoutError::NotEquippable {
                item: id("31"),
                bucket: BucketCategory::General,
            })
        );
    }

    #[test]
    fn staging_refusal_names_the_item() {
        // B has no spare energy weapon once 21 is gone.
        let snap = AccountSnapshot::new().with_equipped(b(), item("20", BucketCategory::EnergyWeapon));

        let err = plan_loadout(&TransferPlanner::new(), &a(), &[id("20")], &snap).unwrap_err();

        assert!(matches!(
            err,
            LoadoutError::Staging {
                ref item,
                refusal: Refusal::NoReplacementAvailable { .. },
            } if *item == id("20")
        ));
    }

    #[tokio::test]
    async fn executes_staging_then_one_bulk_equip() {
        let client = RecordingClient::new();
        let plan = plan_loadout(&TransferPlanner::new(), &a(), &[id("11"), id("30")], &snapshot()).unwrap();

        execute_loadout(&client, &plan).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].step_kind(), Some(StepKind::TransferToCharacter));
        assert_eq!(
            calls[1],
            RecordedCall::EquipMany(EquipManyArgs {
                item_ids: vec![id("11"), id("30")],
                character_id: a(),
            })
        );
    }

    #[tokio::test]
    async fn staging_failure_skips_the_bulk_equip() {
        let client = RecordingClient::failing_at(0);
        let plan = plan_loadout(&TransferPlanner::new(), &a(), &[id("30")], &snapshot()).unwrap();

        let err = execute_loadout(&client, &plan).await.unwrap_err();

        assert!(matches!(err, LoadoutError::Transfer(TransferError { step_index: 0, .. })));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn bulk_equip_failure_is_reported() {
        let client = RecordingClient::failing_at(0);
        let plan = plan_loadout(&TransferPlanner::new(), &a(), &[id("10")], &snapshot()).unwrap();

        let err = execute_loadout(&client, &plan).await.unwrap_err();

        assert!(matches!(err, LoadoutError::Equip(RemoteError::Rejected(_))));
    }
}
