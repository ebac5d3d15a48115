mod database_config;
mod invitations_config;
mod raw_config;
mod smtp_config;
mod tasks_config;

use url::Url;

pub use self::{
    database_config::DatabaseConfig, invitations_config::InvitationsConfig, raw_config::RawConfig,
    smtp_config::SmtpConfig, tasks_config::TasksConfig,
};

/// Main server config.
#[derive(Clone, Debug)]
pub struct Config {
    /// External/public URL through which service is being accessed.
    pub public_url: Url,
    /// Database configuration.
    pub db: DatabaseConfig,
    /// Configuration for the SMTP functionality.
    pub smtp: Option<SmtpConfig>,
    /// Configuration for the background tasks worker.
    pub tasks: TasksConfig,
    /// Configuration for the invitations.
    pub invitations: InvitationsConfig,
}

impl AsRef<Config> for Config {
    fn as_ref(&self) -> &Config {
        self
    }
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        Self {
            public_url: raw_config.public_url,
            db: raw_config.db,
            smtp: raw_config.smtp,
            tasks: raw_config.tasks,
            invitations: raw_config.invitations,
        }
    }
}
