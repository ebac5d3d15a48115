use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use time::OffsetDateTime;

/// Characters invitation codes are made of.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Single-use code that grants registration rights to one mail address.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    /// Unique id of the invitation, `0` until the invitation is stored.
    pub id: i64,
    /// Unique invitation code.
    pub code: String,
    /// The only mail address the code can be used with.
    pub mail_address: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    /// Date when the invitation email was handed over to the SMTP server.
    #[serde(with = "time::serde::timestamp::option")]
    pub sent_at: Option<OffsetDateTime>,
    /// Whether the code has been used to register.
    pub accepted: bool,
}

impl Invitation {
    /// Total length of the invitation code, including the prefix.
    pub const CODE_LENGTH: usize = 10;

    /// Generates a random code that starts with the specified prefix.
    pub fn generate_code(prefix: &str) -> String {
        let mut rng = rand::thread_rng();
        let random_part = (0..Self::CODE_LENGTH.saturating_sub(prefix.len()))
            .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char);

        prefix.chars().chain(random_part).collect()
    }

    /// The validity window starts when the invitation is sent, or when it's created if it's not
    /// sent yet.
    pub fn valid_since(&self) -> OffsetDateTime {
        self.sent_at.unwrap_or(self.created_at)
    }

    /// Checks whether the validity window has passed.
    pub fn has_expired(&self, now: OffsetDateTime, valid_duration: Duration) -> bool {
        now - self.valid_since() >= valid_duration
    }

    /// Live invitations can still be used to register.
    pub fn is_live(&self, now: OffsetDateTime, valid_duration: Duration) -> bool {
        !self.accepted && !self.has_expired(now, valid_duration)
    }
}
