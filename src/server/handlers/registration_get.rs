use crate::{
    error::Error as ClubrollError,
    forms::FormErrors,
    members::MemberRegistrationParams,
    server::{handlers::render_page, ServerState},
};
use actix_web::{get, http::StatusCode, web, HttpResponse};
use clubroll_types::members::{Programme, Semester};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct RegistrationQuery {
    /// Invitation code from the invitation email.
    i: Option<String>,
}

/// Renders an empty registration form, prefilled with the invitation details if the invitation
/// code is passed.
#[get("/members/registration")]
pub async fn registration_get(
    state: web::Data<ServerState>,
    query: web::Query<RegistrationQuery>,
) -> Result<HttpResponse, ClubrollError> {
    let mut form = MemberRegistrationParams::default();
    if let Some(code) = query.into_inner().i {
        if let Some(invitation) = state.api.invitations().get_invitation_by_code(&code).await? {
            form.email = invitation.mail_address;
        }
        form.invitation_code = code;
    }

    render_registration_form(&state, StatusCode::OK, &form, &FormErrors::default())
}

/// Renders registration form with the submitted values and validation errors.
pub(super) fn render_registration_form(
    state: &ServerState,
    status: StatusCode,
    form: &MemberRegistrationParams,
    errors: &FormErrors,
) -> Result<HttpResponse, ClubrollError> {
    let programmes = Programme::ALL
        .iter()
        .map(|programme| {
            json!({
                "tag": programme.tag(),
                "name": programme.name(),
                "selected": programme.tag() == form.programme,
            })
        })
        .collect::<Vec<_>>();
    let semesters = Semester::all()
        .map(|semester| {
            json!({
                "number": semester.number(),
                "label": semester.label(),
                "selected": semester.number().to_string() == form.semester.trim(),
            })
        })
        .collect::<Vec<_>>();

    render_page(
        state,
        status,
        "registration",
        &json!({
            "form": form,
            "errors": errors,
            "programmes": programmes,
            "semesters": semesters,
        }),
    )
}
