use serde::Serialize;
use time::OffsetDateTime;

/// Identity record. Staff users have a password and can sign in, members' users don't.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique id of the user, `0` until the user is stored.
    pub id: i64,
    /// Email the user signs in with, unique case-insensitively.
    pub email: String,
    /// Argon2 PHC string, `None` for users that cannot sign in.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Date when the user was created.
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Staff and superusers are allowed to generate invitations.
    pub fn can_generate_invitations(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}
