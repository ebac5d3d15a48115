use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Configuration for the SMTP functionality.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// Username to use to authenticate to the SMTP server, also used as the sender address.
    pub username: String,
    /// Password to use to authenticate to the SMTP server.
    pub password: String,
    /// Address of the SMTP server.
    pub address: String,
    /// Minimal delay between two consequent emails.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "SmtpConfig::default_throttle_delay")]
    pub throttle_delay: Duration,
}

impl SmtpConfig {
    fn default_throttle_delay() -> Duration {
        Duration::from_secs(1)
    }
}
