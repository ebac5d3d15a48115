mod status;

pub use self::status::Status;
use crate::{api::Api, error::Error as ClubrollError, users::User};
use actix_web::{http::header, HttpRequest};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;
use tracing::warn;

pub struct ServerState {
    pub api: Arc<Api>,
    /// Version of the server.
    version: String,
}

impl ServerState {
    pub fn new(api: Arc<Api>) -> Self {
        Self {
            api,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Gets the status of the server.
    pub fn status(&self) -> Status {
        Status {
            version: self.version.clone(),
        }
    }

    /// Authenticates the request with HTTP Basic credentials and makes sure that the user is
    /// allowed to manage invitations.
    pub async fn authenticate_staff(&self, request: &HttpRequest) -> Result<User, ClubrollError> {
        let Some((email, password)) = basic_credentials(request) else {
            return Err(ClubrollError::unauthorized("Credentials are required."));
        };

        let Some(user) = self.api.users().authenticate(&email, &password).await? else {
            return Err(ClubrollError::unauthorized("Invalid credentials."));
        };

        if !user.can_generate_invitations() {
            warn!(user.id = user.id, "User isn't allowed to manage invitations.");
            return Err(ClubrollError::access_forbidden());
        }

        Ok(user)
    }
}

/// Extracts email and password from the `Authorization: Basic ...` header.
fn basic_credentials(request: &HttpRequest) -> Option<(String, String)> {
    let encoded = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (email, password) = decoded.split_once(':')?;

    Some((email.to_string(), password.to_string()))
}
