use clubroll_types::members::{Programme, Semester};
use serde::Serialize;
use time::OffsetDateTime;

/// Profile of a registered club member.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Unique id of the member, `0` until the member is stored.
    pub id: i64,
    /// User the member is paired with, `None` if the user was removed.
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roll: String,
    pub about: String,
    /// Phone number in E.164 format.
    pub contact: String,
    pub programme: Programme,
    pub semester: Semester,
    pub has_graduated: bool,
    /// Path of the profile picture relative to the media storage.
    pub profile_pic: String,
    #[serde(with = "time::serde::timestamp")]
    pub joined_at: OffsetDateTime,
}

impl Member {
    /// Picture every member starts with until they upload their own.
    pub const DEFAULT_PROFILE_PIC: &'static str = "defaults/profile.png";

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Storage path for an uploaded profile picture, grouped by programme, year of joining and
    /// semester, e.g. `members/CSE/2024/sem3/ada.png`.
    pub fn profile_pic_path(&self, file_name: &str) -> String {
        format!(
            "members/{}/{}/sem{}/{file_name}",
            self.programme.tag(),
            self.joined_at.year(),
            self.semester.number()
        )
    }
}
