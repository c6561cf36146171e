//! `vaultops-client` — HTTP access to the account service proxy.
//!
//! [`HttpMutationClient`] implements the transfer crate's
//! [`RemoteMutationClient`](vaultops_transfer::RemoteMutationClient) and can
//! also fetch the profile payload an
//! [`AccountSnapshot`](vaultops_inventory::AccountSnapshot) is built from.

pub mod config;
pub mod http;
pub mod wire;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpMutationClient;
