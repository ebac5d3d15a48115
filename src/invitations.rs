mod api_ext;
mod csv_mail_list;
mod database_ext;
mod invitation;
mod invitation_email;

pub use self::{
    api_ext::{InvitationsApi, InvitationsCreateParams, UploadedFile},
    csv_mail_list::CsvMailList,
    database_ext::InvitationsDatabaseExt,
    invitation::Invitation,
    invitation_email::{compile_invitation_email, INVITATION_EMAIL_SUBJECT},
};
pub(crate) use self::database_ext::accept_invitation;
