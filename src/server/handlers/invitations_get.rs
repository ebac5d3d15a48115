use crate::{
    database::Database,
    error::Error as ClubrollError,
    forms::FormErrors,
    invitations::Invitation,
    server::{handlers::render_page, ServerState},
};
use actix_web::{get, http::StatusCode, web, HttpRequest, HttpResponse};
use serde_json::json;

/// Renders the invitations form together with the list of all invitations. Available only to the
/// staff users.
#[get("/members/invitations")]
pub async fn invitations_get(
    state: web::Data<ServerState>,
    request: HttpRequest,
) -> Result<HttpResponse, ClubrollError> {
    state.authenticate_staff(&request).await?;

    render_invitations_page(&state, StatusCode::OK, "", &[], &FormErrors::default()).await
}

/// Renders invitations page with the submitted mail list, just created invitations and validation
/// errors, if any.
pub(super) async fn render_invitations_page(
    state: &ServerState,
    status: StatusCode,
    mail_list: &str,
    created: &[Invitation],
    errors: &FormErrors,
) -> Result<HttpResponse, ClubrollError> {
    let now = Database::utc_now()?;
    let valid_duration = state.api.config.invitations.valid_duration;
    let invitations = state
        .api
        .invitations()
        .get_invitations()
        .await?
        .into_iter()
        .map(|invitation| {
            let status = if invitation.accepted {
                "accepted"
            } else if invitation.has_expired(now, valid_duration) {
                "expired"
            } else if invitation.sent_at.is_some() {
                "sent"
            } else {
                "pending"
            };
            json!({
                "mail_address": invitation.mail_address,
                "code": invitation.code,
                "status": status,
            })
        })
        .collect::<Vec<_>>();

    render_page(
        state,
        status,
        "invitations",
        &json!({
            "mail_list": mail_list,
            "created": created,
            "created_count": created.len(),
            "errors": errors,
            "invitations": invitations,
        }),
    )
}
