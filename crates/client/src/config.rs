//! Environment configuration.

use std::time::Duration;

use vaultops_core::MembershipId;

pub const API_HOST_VAR: &str = "VAULTOPS_API_HOST";
pub const MEMBERSHIP_ID_VAR: &str = "VAULTOPS_MEMBERSHIP_ID";
pub const MEMBERSHIP_TYPE_VAR: &str = "VAULTOPS_MEMBERSHIP_TYPE";
pub const TIMEOUT_VAR: &str = "VAULTOPS_HTTP_TIMEOUT_SECS";

const DEFAULT_MEMBERSHIP_TYPE: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the proxy, without a trailing slash.
    pub api_host: String,
    /// Sent as `username` on every call.
    pub membership_id: MembershipId,
    pub membership_type: u32,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_host: impl Into<String>, membership_id: MembershipId) -> Self {
        Self {
            api_host: normalize_host(api_host.into()),
            membership_id,
            membership_type: DEFAULT_MEMBERSHIP_TYPE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_membership_type(mut self, membership_type: u32) -> Self {
        self.membership_type = membership_type;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the `VAULTOPS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &'static str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_host = read(API_HOST_VAR).ok_or(ConfigError::Missing(API_HOST_VAR))?;
        if !(api_host.starts_with("http://") || api_host.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: API_HOST_VAR,
                reason: format!("expected an http(s) URL, got {api_host:?}"),
            });
        }

        let membership_id = read(MEMBERSHIP_ID_VAR)
            .ok_or(ConfigError::Missing(MEMBERSHIP_ID_VAR))?
            .parse::<MembershipId>()
            .map_err(|err| ConfigError::Invalid {
                var: MEMBERSHIP_ID_VAR,
                reason: err.to_string(),
            })?;

        let membership_type = match read(MEMBERSHIP_TYPE_VAR) {
            Some(raw) => raw.parse::<u32>().map_err(|err| ConfigError::Invalid {
                var: MEMBERSHIP_TYPE_VAR,
                reason: err.to_string(),
            })?,
            None => DEFAULT_MEMBERSHIP_TYPE,
        };

        let timeout_secs = match read(TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: TIMEOUT_VAR,
                        reason: "must be at least 1 second".to_string(),
                    });
                }
                Ok(secs) => secs,
                Err(err) => {
                    return Err(ConfigError::Invalid {
                        var: TIMEOUT_VAR,
                        reason: err.to_string(),
                    });
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(api_host, membership_id)
            .with_membership_type(membership_type)
            .with_timeout(Duration::from_secs(timeout_secs)))
    }
}

fn normalize_host(host: String) -> String {
    host.trim_end_matches('/').to_string()
}
