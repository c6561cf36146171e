//! JSON bodies posted to the account service proxy.

use serde::Serialize;

use vaultops_transfer::{EquipArgs, EquipManyArgs, TransferArgs};

use crate::config::ClientConfig;

pub const TRANSFER_PATH: &str = "/api/user/bungie/post/transfer/";
pub const EQUIP_PATH: &str = "/api/user/bungie/post/equip/";
pub const EQUIP_MANY_PATH: &str = "/api/user/bungie/post/equipmany/";
pub const PROFILE_PATH: &str = "/api/user/bungie/get/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody<'a> {
    pub username: &'a str,
    pub item_reference_hash: u32,
    /// Always 1: stacks move one unit at a time.
    pub stack_size: u32,
    pub transfer_to_vault: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<&'a str>,
    pub character_id: &'a str,
    pub membership_type: u32,
}

impl<'a> TransferBody<'a> {
    pub fn new(config: &'a ClientConfig, args: &'a TransferArgs) -> Self {
        Self {
            username: config.membership_id.as_str(),
            item_reference_hash: args.item_template_hash.0,
            stack_size: 1,
            transfer_to_vault: args.to_shared_pool,
            item_id: args.item_id.as_ref().map(|id| id.as_str()),
            character_id: args.character_id.as_str(),
            membership_type: config.membership_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipBody<'a> {
    pub username: &'a str,
    pub item_id: &'a str,
    pub character_id: &'a str,
    pub membership_type: u32,
}

impl<'a> EquipBody<'a> {
    pub fn new(config: &'a ClientConfig, args: &'a EquipArgs) -> Self {
        Self {
            username: config.membership_id.as_str(),
            item_id: args.item_id.as_str(),
            character_id: args.character_id.as_str(),
            membership_type: config.membership_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipManyBody<'a> {
    pub username: &'a str,
    pub item_ids: Vec<&'a str>,
    pub character_id: &'a str,
    pub membership_type: u32,
}

impl<'a> EquipManyBody<'a> {
    pub fn new(config: &'a ClientConfig, args: &'a EquipManyArgs) -> Self {
        Self {
            username: config.membership_id.as_str(),
            item_ids: args.item_ids.iter().map(|id| id.as_str()).collect(),
            character_id: args.character_id.as_str(),
            membership_type: config.membership_type,
        }
    }
}
