//! Configuration options for the authorization core.
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Configuration options for the authorization core.
///
/// Meant to be embedded in the configuration file of the process using the core.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthConf {
    /// Report unknown local users and remote clusters as a generic access denied error.
    ///
    /// The original not found error is kept in the error chain for logging.
    #[serde(default)]
    pub conceal_not_found: bool,

    /// Session lifetime, in seconds, for roles that do not set a maximum.
    #[serde(default = "AuthConf::default_max_session_ttl_sec")]
    pub default_max_session_ttl_sec: u64,
}

impl AuthConf {
    fn default_max_session_ttl_sec() -> u64 {
        30 * 60 * 60
    }

    /// Session lifetime for roles that do not set a maximum.
    pub fn default_max_session_ttl(&self) -> Duration {
        Duration::from_secs(self.default_max_session_ttl_sec)
    }
}

impl Default for AuthConf {
    fn default() -> Self {
        AuthConf {
            conceal_not_found: false,
            default_max_session_ttl_sec: Self::default_max_session_ttl_sec(),
        }
    }
}
