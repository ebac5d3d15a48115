use crate::{
    error::Error as ClubrollError,
    server::{handlers::render_page, ServerState},
};
use actix_web::{get, http::StatusCode, web, HttpResponse};
use serde_json::json;
use tracing::error;

/// Renders the home page with the list of registered members.
#[get("/")]
pub async fn index_get(state: web::Data<ServerState>) -> Result<HttpResponse, ClubrollError> {
    let members = match state.api.members().get_members().await {
        Ok(members) => members,
        Err(err) => {
            error!("Failed to retrieve members: {err:?}");
            return Err(err.into());
        }
    };

    let members = members
        .iter()
        .map(|member| {
            json!({
                "full_name": member.full_name(),
                "programme": member.programme.name(),
                "semester": member.semester.label(),
                "has_graduated": member.has_graduated,
            })
        })
        .collect::<Vec<_>>();

    render_page(
        &state,
        StatusCode::OK,
        "index",
        &json!({ "members_count": members.len(), "members": members }),
    )
}
