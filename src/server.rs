mod handlers;
mod server_state;

use crate::{
    api::Api,
    config::{Config, RawConfig},
    database::Database,
    network::{Network, Smtp, SmtpTransport},
    templates::create_templates,
};
use actix_web::{middleware, web, App, HttpServer, Result};
use anyhow::Context;
use lettre::transport::smtp::authentication::Credentials;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub use server_state::ServerState;

/// Builds APIs collection shared by the HTTP server and the background worker.
pub async fn create_api(raw_config: RawConfig) -> anyhow::Result<Arc<Api>> {
    let database = Database::connect(&raw_config.db).await?;

    let smtp = if let Some(ref smtp_config) = raw_config.smtp {
        let transport = SmtpTransport::relay(&smtp_config.address)
            .with_context(|| format!("Cannot use '{}' as SMTP relay.", smtp_config.address))?
            .credentials(Credentials::new(
                smtp_config.username.clone(),
                smtp_config.password.clone(),
            ))
            .build();
        Some(Smtp::new(transport, smtp_config.clone()))
    } else {
        warn!("SMTP isn't configured, invitation emails won't be sent.");
        None
    };

    Ok(Arc::new(Api::new(
        Config::from(raw_config),
        database,
        Network::new(smtp),
        create_templates()?,
    )))
}

pub async fn run(raw_config: RawConfig) -> Result<(), anyhow::Error> {
    let http_port = raw_config.port;
    let api = create_api(raw_config).await?;

    let state = web::Data::new(ServerState::new(api));
    let http_server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compat::new(TracingLogger::default()))
            .wrap(middleware::NormalizePath::trim())
            .app_data(state.clone())
            .app_data(handlers::invitations_post::invitations_form_config())
            .service(handlers::status_get::status_get)
            .service(handlers::index_get::index_get)
            .service(handlers::registration_get::registration_get)
            .service(handlers::registration_post::registration_post)
            .service(handlers::invitations_get::invitations_get)
            .service(handlers::invitations_post::invitations_post)
    });

    let http_server_url = format!("0.0.0.0:{}", http_port);
    let http_server = http_server
        .bind(&http_server_url)
        .with_context(|| format!("Failed to bind to {http_server_url}."))?;

    info!("Clubroll server is available at http://{http_server_url}");

    http_server
        .run()
        .await
        .context("Failed to run Clubroll server.")
}
