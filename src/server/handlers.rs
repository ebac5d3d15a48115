pub mod index_get;
pub mod invitations_get;
pub mod invitations_post;
pub mod registration_get;
pub mod registration_post;
pub mod status_get;

use crate::{error::Error as ClubrollError, server::ServerState};
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Renders the template as an HTML page with the specified status.
fn render_page<T: Serialize>(
    state: &ServerState,
    status: StatusCode,
    template: &str,
    data: &T,
) -> Result<HttpResponse, ClubrollError> {
    let page = state
        .api
        .templates
        .render(template, data)
        .map_err(anyhow::Error::from)?;

    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(page))
}
