use crate::{api::Api, database::Database, error::Error as ClubrollError, users::User};
use anyhow::{anyhow, bail};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lettre::Address;
use tracing::{debug, info};

/// Describes the API to work with users.
pub struct UsersApi<'a> {
    api: &'a Api,
}

impl<'a> UsersApi<'a> {
    /// Creates Users API.
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Creates a staff user that can sign in with the specified password.
    pub async fn create_staff(
        &self,
        email: &str,
        password: &str,
        superuser: bool,
    ) -> anyhow::Result<User> {
        let email = email.trim();
        if email.parse::<Address>().is_err() {
            bail!(ClubrollError::client(format!(
                "'{email}' is not a valid email address."
            )));
        }

        if password.is_empty() {
            bail!(ClubrollError::client("Password cannot be empty."));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| anyhow!("Failed to hash password: {err}"))?
            .to_string();

        let mut user = User {
            id: 0,
            email: email.to_string(),
            password_hash: Some(password_hash),
            is_staff: true,
            is_superuser: superuser,
            created_at: Database::utc_now()?,
        };
        user.id = self.api.db.users().insert_user(&user).await?;

        info!(user.id = user.id, user.superuser = superuser, "Created staff user.");

        Ok(user)
    }

    /// Returns the user if the email and password match, `None` otherwise.
    pub async fn authenticate(&self, email: &str, password: &str) -> anyhow::Result<Option<User>> {
        let Some(user) = self.api.db.users().get_user_by_email(email.trim()).await? else {
            debug!("Authentication failed: unknown user.");
            return Ok(None);
        };

        let Some(ref password_hash) = user.password_hash else {
            debug!(user.id = user.id, "Authentication failed: user cannot sign in.");
            return Ok(None);
        };

        let password_hash = PasswordHash::new(password_hash)
            .map_err(|err| anyhow!("Stored password hash is malformed: {err}"))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &password_hash)
            .is_err()
        {
            debug!(user.id = user.id, "Authentication failed: wrong password.");
            return Ok(None);
        }

        Ok(Some(user))
    }
}

impl Api {
    /// Returns an API to work with users.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }
}
