mod member_registration_params;

pub use self::member_registration_params::MemberRegistrationParams;
use crate::{
    api::Api,
    database::Database,
    error::Error as ClubrollError,
    forms::FormErrors,
    members::{
        member_validation::{
            check_graduation, normalize_contact, roll_matches_programme, MAX_ABOUT_LENGTH,
            MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_ROLL_LENGTH,
        },
        Member,
    },
    users::User,
};
use anyhow::bail;
use clubroll_types::members::{Programme, Semester};
use lettre::Address;
use tracing::info;

const REQUIRED_FIELD: &str = "This field is required.";

/// Describes the API to work with members.
pub struct MembersApi<'a> {
    api: &'a Api,
}

impl<'a> MembersApi<'a> {
    /// Creates Members API.
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Validates the registration form and registers a member paired with a new user, accepting
    /// the invitation. All validation errors are collected and returned as `FormErrors`.
    pub async fn register(&self, params: MemberRegistrationParams) -> anyhow::Result<Member> {
        let mut errors = FormErrors::default();

        let first_name = required_text(&mut errors, "first_name", &params.first_name, MAX_NAME_LENGTH);
        let last_name = required_text(&mut errors, "last_name", &params.last_name, MAX_NAME_LENGTH);
        let roll = required_text(&mut errors, "roll", &params.roll, MAX_ROLL_LENGTH);
        let about = params.about.trim();
        check_length(&mut errors, "about", about, MAX_ABOUT_LENGTH);

        let email = required_text(&mut errors, "email", &params.email, MAX_EMAIL_LENGTH)
            .filter(|email| {
                let is_valid = email.parse::<Address>().is_ok();
                if !is_valid {
                    errors.add_field("email", "Enter a valid email address.");
                }
                is_valid
            });

        let contact = required_text(&mut errors, "contact", &params.contact, usize::MAX)
            .and_then(|contact| {
                let normalized = normalize_contact(contact);
                if normalized.is_none() {
                    errors.add_field(
                        "contact",
                        "Enter a valid phone number (e.g. +12125552368).",
                    );
                }
                normalized
            });

        let programme = required_text(&mut errors, "programme", &params.programme, usize::MAX)
            .and_then(|programme| match programme.parse::<Programme>() {
                Ok(programme) => Some(programme),
                Err(_) => {
                    errors.add_field(
                        "programme",
                        format!("Select a valid choice. {programme} is not one of the available choices."),
                    );
                    None
                }
            });

        let semester = required_text(&mut errors, "semester", &params.semester, usize::MAX)
            .and_then(|semester| match semester.parse::<Semester>() {
                Ok(semester) => Some(semester),
                Err(_) => {
                    errors.add_field(
                        "semester",
                        format!("Select a valid choice. {semester} is not one of the available choices."),
                    );
                    None
                }
            });

        if let (Some(roll), Some(programme)) = (roll, programme) {
            if !roll_matches_programme(roll, programme)? {
                errors.add_field(
                    "roll",
                    "Roll number doesn't match the roll-format of the selected programme.",
                );
            }
        }

        let invitation_code = params.invitation_code.trim();
        let invitation = if invitation_code.is_empty() {
            errors.add_field("invitation_code", REQUIRED_FIELD);
            None
        } else {
            self.api
                .db
                .invitations()
                .get_invitation_by_code(invitation_code)
                .await?
        };
        let invitation = match invitation {
            None if !invitation_code.is_empty() => {
                errors.add_field(
                    "invitation_code",
                    "Invalid invitation code! Please contact club authorities for more information.",
                );
                None
            }
            Some(invitation) if invitation.accepted => {
                errors.add_field(
                    "invitation_code",
                    "This invitation code was already accepted! Please contact club authorities if this was not done by you.",
                );
                None
            }
            Some(invitation) if !self.api.invitations().is_live(&invitation)? => {
                errors.add_field(
                    "invitation_code",
                    "This invitation code has expired! Please contact club authorities to request a new one.",
                );
                None
            }
            invitation => invitation,
        };

        if let (Some(invitation), Some(email)) = (&invitation, email) {
            if !invitation.mail_address.eq_ignore_ascii_case(email) {
                errors.add_field("email", "This email wasn't sent an invitation.");
            }
        }

        let members_db = self.api.db.members();
        if let Some(email) = email {
            if members_db.get_member_by_email(email).await?.is_some()
                || self.api.db.users().get_user_by_email(email).await?.is_some()
            {
                errors.add_field("email", "Member with this Email already exists.");
            }
        }
        if let Some(roll) = roll {
            if members_db.get_member_by_roll(roll).await?.is_some() {
                errors.add_field("roll", "Member with this Roll number already exists.");
            }
        }
        if let Some(ref contact) = contact {
            if members_db.get_member_by_contact(contact).await?.is_some() {
                errors.add_field("contact", "Member with this Phone number already exists.");
            }
        }

        let (
            Some(invitation),
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(roll),
            Some(contact),
            Some(programme),
            Some(semester),
        ) = (
            invitation, first_name, last_name, email, roll, contact, programme, semester,
        )
        else {
            bail!(errors);
        };
        errors.into_result()?;

        let now = Database::utc_now()?;
        let user = User {
            id: 0,
            email: email.to_string(),
            password_hash: None,
            is_staff: false,
            is_superuser: false,
            created_at: now,
        };
        let member = Member {
            id: 0,
            user_id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            roll: roll.to_uppercase(),
            about: about.to_string(),
            contact,
            programme,
            semester,
            has_graduated: false,
            profile_pic: Member::DEFAULT_PROFILE_PIC.to_string(),
            joined_at: now,
        };

        let (user_id, member_id) = members_db
            .register_member(&user, &member, invitation.id)
            .await?;
        info!(
            member.id = member_id,
            user.id = user_id,
            invitation.id = invitation.id,
            "Registered a new member."
        );

        Ok(Member {
            id: member_id,
            user_id: Some(user_id),
            ..member
        })
    }

    /// Returns all members in the order they joined.
    pub async fn get_members(&self) -> anyhow::Result<Vec<Member>> {
        self.api.db.members().get_members().await
    }

    /// Returns member with the specified email.
    pub async fn get_member_by_email(&self, email: &str) -> anyhow::Result<Option<Member>> {
        self.api.db.members().get_member_by_email(email.trim()).await
    }

    /// Marks the member as graduated or not, only final semester students can graduate.
    pub async fn set_graduated(&self, id: i64, has_graduated: bool) -> anyhow::Result<Member> {
        let Some(member) = self.api.db.members().get_member(id).await? else {
            bail!(ClubrollError::client(format!(
                "A member ('{id}') doesn't exist."
            )));
        };

        if let Err(message) = check_graduation(member.semester, has_graduated) {
            let mut errors = FormErrors::default();
            errors.add_field("has_graduated", message);
            bail!(errors);
        }

        self.api
            .db
            .members()
            .update_member_graduation(id, has_graduated)
            .await?;

        Ok(Member {
            has_graduated,
            ..member
        })
    }
}

/// Trims the value and checks that it's present and not too long.
fn required_text<'v>(
    errors: &mut FormErrors,
    field: &'static str,
    value: &'v str,
    max_length: usize,
) -> Option<&'v str> {
    let value = value.trim();
    if value.is_empty() {
        errors.add_field(field, REQUIRED_FIELD);
        return None;
    }

    check_length(errors, field, value, max_length).then_some(value)
}

fn check_length(errors: &mut FormErrors, field: &'static str, value: &str, max_length: usize) -> bool {
    let length = value.chars().count();
    if length > max_length {
        errors.add_field(
            field,
            format!("Ensure this value has at most {max_length} characters (it has {length})."),
        );
        return false;
    }

    true
}

impl Api {
    /// Returns an API to work with members.
    pub fn members(&self) -> MembersApi<'_> {
        MembersApi::new(self)
    }
}
