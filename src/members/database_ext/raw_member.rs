use crate::members::Member;
use anyhow::anyhow;
use clubroll_types::members::{Programme, Semester};
use time::OffsetDateTime;

#[derive(sqlx::FromRow, Debug, Eq, PartialEq, Clone)]
pub(super) struct RawMember {
    pub id: i64,
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roll: String,
    pub about: String,
    pub contact: String,
    pub programme: String,
    pub semester: i64,
    pub has_graduated: bool,
    pub profile_pic: String,
    pub joined_at: OffsetDateTime,
}

impl TryFrom<RawMember> for Member {
    type Error = anyhow::Error;

    fn try_from(raw_member: RawMember) -> Result<Self, Self::Error> {
        let semester = u8::try_from(raw_member.semester)?;
        Ok(Member {
            id: raw_member.id,
            user_id: raw_member.user_id,
            first_name: raw_member.first_name,
            last_name: raw_member.last_name,
            email: raw_member.email,
            roll: raw_member.roll,
            about: raw_member.about,
            contact: raw_member.contact,
            programme: raw_member.programme.parse::<Programme>().map_err(|err| anyhow!(err))?,
            semester: Semester::try_from(semester).map_err(|err| anyhow!(err))?,
            has_graduated: raw_member.has_graduated,
            profile_pic: raw_member.profile_pic,
            joined_at: raw_member.joined_at,
        })
    }
}
