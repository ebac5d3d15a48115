mod email_transport;
mod smtp;

pub use self::{
    email_transport::EmailTransport,
    smtp::{Smtp, SmtpTransport},
};

/// Network utilities.
pub struct Network {
    /// SMTP utilities, `None` if SMTP isn't configured.
    pub smtp: Option<Smtp>,
}

impl Network {
    /// Creates a new `Network` instance.
    pub fn new(smtp: Option<Smtp>) -> Self {
        Self { smtp }
    }
}
