/// File uploaded through the invitations form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original name of the file.
    pub name: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

/// Parameters for the batch creation of the invitations, at least one source of the mail
/// addresses should be provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationsCreateParams {
    /// Comma separated list of mail addresses.
    pub mail_list: Option<String>,
    /// CSV file with the `email` column.
    pub csv_file: Option<UploadedFile>,
}
