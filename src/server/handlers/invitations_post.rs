use crate::{
    error::Error as ClubrollError,
    forms::FormErrors,
    invitations::{InvitationsCreateParams, UploadedFile},
    server::{handlers::invitations_get::render_invitations_page, ServerState},
};
use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm, MultipartFormConfig};
use actix_web::{http::StatusCode, post, web, FromRequest, HttpRequest, HttpResponse};
use tracing::{error, info};

/// Maximum size of the whole invitations form, in bytes.
const INVITATIONS_FORM_LIMIT: usize = 2 * 1024 * 1024;

/// Invitations form submitted as `multipart/form-data`.
#[derive(MultipartForm)]
pub struct InvitationsForm {
    #[multipart(limit = "256KiB")]
    mail_list: Option<Text<String>>,
    #[multipart(limit = "1MiB")]
    csv_file: Option<Bytes>,
}

/// Limits applied while the invitations form is buffered.
pub fn invitations_form_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(INVITATIONS_FORM_LIMIT)
        .memory_limit(INVITATIONS_FORM_LIMIT)
}

/// Creates invitations for the submitted mail addresses and schedules the invitation emails.
#[post("/members/invitations")]
pub async fn invitations_post(
    state: web::Data<ServerState>,
    request: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, ClubrollError> {
    // Form is only buffered for authenticated staff.
    let staff = state.authenticate_staff(&request).await?;

    let form = MultipartForm::<InvitationsForm>::from_request(&request, &mut payload.into_inner())
        .await
        .map_err(|err| ClubrollError::client(format!("Invalid invitations form: {err}")))?
        .into_inner();
    let mail_list = form.mail_list.map(Text::into_inner);
    let params = InvitationsCreateParams {
        mail_list: mail_list.clone(),
        csv_file: form.csv_file.map(|file| UploadedFile {
            name: file.file_name.unwrap_or_default(),
            content: file.data.to_vec(),
        }),
    };

    match state.api.invitations().create_invitations(params).await {
        Ok(invitations) => {
            info!(
                user.id = staff.id,
                invitations.count = invitations.len(),
                "Staff user created invitations."
            );
            render_invitations_page(
                &state,
                StatusCode::OK,
                "",
                &invitations,
                &FormErrors::default(),
            )
            .await
        }
        Err(err) => match err.downcast::<FormErrors>() {
            Ok(errors) => {
                render_invitations_page(
                    &state,
                    StatusCode::BAD_REQUEST,
                    mail_list.as_deref().unwrap_or_default(),
                    &[],
                    &errors,
                )
                .await
            }
            Err(err) => {
                error!(user.id = staff.id, "Failed to create invitations: {err:?}");
                Err(err.into())
            }
        },
    }
}
