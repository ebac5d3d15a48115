mod invitations_create_params;

pub use self::invitations_create_params::{InvitationsCreateParams, UploadedFile};
use crate::{
    api::Api,
    database::Database,
    forms::FormErrors,
    invitations::{CsvMailList, Invitation},
};
use anyhow::bail;
use lettre::Address;
use std::collections::HashSet;
use tracing::{debug, info};

/// Maximum number of attempts to generate an invitation code that isn't used yet.
const MAX_CODE_GENERATION_ATTEMPTS: usize = 100;

/// Describes the API to work with invitations.
pub struct InvitationsApi<'a> {
    api: &'a Api,
}

impl<'a> InvitationsApi<'a> {
    /// Creates Invitations API.
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Validates the mail addresses and creates an invitation with a send task for every one of
    /// them. Nothing is created if any of the addresses cannot be invited, the validation errors
    /// are returned as `FormErrors`.
    pub async fn create_invitations(
        &self,
        params: InvitationsCreateParams,
    ) -> anyhow::Result<Vec<Invitation>> {
        let mut errors = FormErrors::default();

        let mail_list = params
            .mail_list
            .as_deref()
            .map(str::trim)
            .filter(|mail_list| !mail_list.is_empty());
        let csv_file = params
            .csv_file
            .filter(|file| !file.name.is_empty() || !file.content.is_empty());
        if mail_list.is_none() && csv_file.is_none() {
            errors.add("No input provided.");
            bail!(errors);
        }

        let mut mail_addresses = vec![];
        if let Some(mail_list) = mail_list {
            mail_addresses.extend(
                mail_list
                    .split(',')
                    .map(str::trim)
                    .filter(|mail_address| !mail_address.is_empty())
                    .map(str::to_string),
            );
        }

        if let Some(csv_file) = csv_file {
            if !CsvMailList::supports(&csv_file.name) {
                errors.add_field(
                    "csv_file",
                    "Invalid file format. Please upload a CSV file.",
                );
            } else {
                match CsvMailList::parse(&csv_file.content) {
                    Ok(file_mail_addresses) => mail_addresses.extend(file_mail_addresses),
                    Err(message) => errors.add_field("csv_file", message),
                }
            }
        }
        errors.into_result()?;

        let mut errors = FormErrors::default();
        let mut seen_mail_addresses = HashSet::new();
        mail_addresses.retain(|mail_address| seen_mail_addresses.insert(mail_address.to_lowercase()));
        for mail_address in mail_addresses.iter() {
            if mail_address.parse::<Address>().is_err() {
                errors.add(format!("{mail_address}: Enter a valid email address."));
            }
        }
        errors.into_result()?;

        // Free mail addresses held by the invitations that nobody used in time.
        let now = Database::utc_now()?;
        self.remove_expired_invitations().await?;

        let mut errors = FormErrors::default();
        let invitations_db = self.api.db.invitations();
        for mail_address in mail_addresses.iter() {
            match invitations_db.get_invitation_by_mail(mail_address).await? {
                Some(invitation) if invitation.accepted => errors.add(format!(
                    "{mail_address}: This mail has already accepted an invitation before."
                )),
                Some(_) => errors.add(format!(
                    "{mail_address}: A valid invitation already exists for this mail."
                )),
                None => {}
            }
        }
        errors.into_result()?;

        let mut codes = HashSet::new();
        let mut invitations = Vec::with_capacity(mail_addresses.len());
        for mail_address in mail_addresses {
            let code = self.generate_unique_code(&codes).await?;
            codes.insert(code.clone());
            invitations.push(Invitation {
                id: 0,
                code,
                mail_address,
                created_at: now,
                sent_at: None,
                accepted: false,
            });
        }

        let invitations = invitations_db
            .insert_invitations_with_send_tasks(&invitations)
            .await?;
        info!(
            invitations.count = invitations.len(),
            "Created invitations and scheduled them for sending."
        );

        Ok(invitations)
    }

    /// Removes invitations that weren't accepted within the validity window.
    pub async fn remove_expired_invitations(&self) -> anyhow::Result<u64> {
        let removed = self
            .api
            .db
            .invitations()
            .remove_expired_invitations(
                Database::utc_now()?,
                self.api.config.invitations.valid_duration,
            )
            .await?;
        if removed > 0 {
            debug!(invitations.removed = removed, "Removed expired invitations.");
        }

        Ok(removed)
    }

    /// Returns all invitations, newest first.
    pub async fn get_invitations(&self) -> anyhow::Result<Vec<Invitation>> {
        self.api.db.invitations().get_invitations().await
    }

    /// Returns invitation with the specified code.
    pub async fn get_invitation_by_code(&self, code: &str) -> anyhow::Result<Option<Invitation>> {
        self.api.db.invitations().get_invitation_by_code(code).await
    }

    /// Removes invitation with the specified ID.
    pub async fn remove_invitation(&self, id: i64) -> anyhow::Result<()> {
        self.api.db.invitations().remove_invitation(id).await
    }

    /// Checks whether the invitation can still be used to register.
    pub fn is_live(&self, invitation: &Invitation) -> anyhow::Result<bool> {
        Ok(invitation.is_live(
            Database::utc_now()?,
            self.api.config.invitations.valid_duration,
        ))
    }

    /// Generates a code that is neither stored nor reserved by the current batch.
    async fn generate_unique_code(&self, reserved_codes: &HashSet<String>) -> anyhow::Result<String> {
        let prefix = self.api.config.invitations.code_prefix.as_str();
        for _ in 0..MAX_CODE_GENERATION_ATTEMPTS {
            let code = Invitation::generate_code(prefix);
            if !reserved_codes.contains(&code)
                && self
                    .api
                    .db
                    .invitations()
                    .get_invitation_by_code(&code)
                    .await?
                    .is_none()
            {
                return Ok(code);
            }
        }

        bail!("Couldn't generate a unique invitation code with '{prefix}' prefix.")
    }
}

impl Api {
    /// Returns an API to work with invitations.
    pub fn invitations(&self) -> InvitationsApi<'_> {
        InvitationsApi::new(self)
    }
}
