use crate::server::ServerState;
use actix_web::{get, web, HttpResponse};

/// Gets server status.
#[get("/api/status")]
pub async fn status_get(state: web::Data<ServerState>) -> HttpResponse {
    HttpResponse::Ok().json(state.status())
}
