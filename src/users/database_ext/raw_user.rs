use crate::users::User;
use time::OffsetDateTime;

#[derive(sqlx::FromRow, Debug, Eq, PartialEq, Clone)]
pub(super) struct RawUser {
    pub id: i64,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: OffsetDateTime,
}

impl TryFrom<RawUser> for User {
    type Error = anyhow::Error;

    fn try_from(raw_user: RawUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: raw_user.id,
            email: raw_user.email,
            password_hash: raw_user.password_hash,
            is_staff: raw_user.is_staff,
            is_superuser: raw_user.is_superuser,
            created_at: raw_user.created_at,
        })
    }
}
