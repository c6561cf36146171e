//! reqwest-backed [`RemoteMutationClient`].

use async_trait::async_trait;
use serde::Serialize;

use vaultops_inventory::ProfileResponse;
use vaultops_transfer::{EquipArgs, EquipManyArgs, RemoteError, RemoteMutationClient, TransferArgs};

use crate::config::{ClientConfig, ConfigError};
use crate::wire::{
    EQUIP_MANY_PATH, EQUIP_PATH, EquipBody, EquipManyBody, PROFILE_PATH, TRANSFER_PATH, TransferBody,
};

/// One POST per remote mutation; no retries.
///
/// A non-2xx answer becomes [`RemoteError::Api`], anything that prevented an
/// answer (connect failure, timeout) becomes [`RemoteError::Network`].
#[derive(Debug, Clone)]
pub struct HttpMutationClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpMutationClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_host, path)
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        let url = self.url(path);
        tracing::debug!(%url, "posting remote mutation");

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "remote mutation rejected");
            return Err(RemoteError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Fetch the account's profile payload.
    pub async fn fetch_profile(&self) -> Result<ProfileResponse, RemoteError> {
        let url = self.url(PROFILE_PATH);
        let resp = self
            .http
            .get(&url)
            .query(&[("username", self.config.membership_id.as_str())])
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let profile = resp
            .json::<ProfileResponse>()
            .await
            .map_err(|e| RemoteError::Rejected(format!("malformed profile payload: {e}")))?;
        tracing::debug!("fetched profile");
        Ok(profile)
    }
}

#[async_trait]
impl RemoteMutationClient for HttpMutationClient {
    async fn transfer(&self, args: TransferArgs) -> Result<(), RemoteError> {
        self.post(TRANSFER_PATH, &TransferBody::new(&self.config, &args)).await
    }

    async fn equip(&self, args: EquipArgs) -> Result<(), RemoteError> {
        self.post(EQUIP_PATH, &EquipBody::new(&self.config, &args)).await
    }

    async fn equip_many(&self, args: EquipManyArgs) -> Result<(), RemoteError> {
        self.post(EQUIP_MANY_PATH, &EquipManyBody::new(&self.config, &args))
            .await
    }
}
