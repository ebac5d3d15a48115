use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Configuration for the invitations.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InvitationsConfig {
    /// How long an invitation stays valid once it's sent (default is 3 days).
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub valid_duration: Duration,
    /// Prefix every invitation code starts with.
    pub code_prefix: String,
    /// Contact address mentioned in the invitation emails.
    pub contact: String,
}

impl Default for InvitationsConfig {
    fn default() -> Self {
        Self {
            valid_duration: Duration::from_secs(3 * 24 * 3600),
            code_prefix: "INV".to_string(),
            contact: "club@clubroll.dev".to_string(),
        }
    }
}
