use crate::invitations::Invitation;
use time::OffsetDateTime;

#[derive(sqlx::FromRow, Debug, Eq, PartialEq, Clone)]
pub(super) struct RawInvitation {
    pub id: i64,
    pub code: String,
    pub mail_address: String,
    pub created_at: OffsetDateTime,
    pub sent_at: Option<OffsetDateTime>,
    pub accepted: bool,
}

impl TryFrom<RawInvitation> for Invitation {
    type Error = anyhow::Error;

    fn try_from(raw_invitation: RawInvitation) -> Result<Self, Self::Error> {
        Ok(Invitation {
            id: raw_invitation.id,
            code: raw_invitation.code,
            mail_address: raw_invitation.mail_address,
            created_at: raw_invitation.created_at,
            sent_at: raw_invitation.sent_at,
            accepted: raw_invitation.accepted,
        })
    }
}
