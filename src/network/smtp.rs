use crate::{config::SmtpConfig, network::EmailTransport};
use lettre::{AsyncSmtpTransport, Message, Tokio1Executor};
use std::time::Duration;
use tokio::{
    sync::Mutex,
    time::{interval, Interval, MissedTickBehavior},
};
use tracing::debug;

/// Type alias for the SMTP transport.
pub type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

/// Shortest delay between consequent emails, `interval` doesn't accept zero periods.
const MIN_THROTTLE_DELAY: Duration = Duration::from_millis(1);

/// SMTP utilities.
pub struct Smtp {
    /// SMTP configuration.
    pub config: SmtpConfig,
    /// The transport used to deliver messages.
    transport: Box<dyn EmailTransport>,
    /// Keeps consequent emails at least `throttle_delay` apart.
    throttle_interval: Mutex<Interval>,
}

impl Smtp {
    /// Creates a new `Smtp` utilities instance.
    pub fn new(transport: impl EmailTransport + 'static, config: SmtpConfig) -> Self {
        let mut throttle_interval = interval(config.throttle_delay.max(MIN_THROTTLE_DELAY));
        throttle_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            transport: Box::new(transport),
            config,
            throttle_interval: Mutex::new(throttle_interval),
        }
    }

    /// Sends the specified email message using the configured transport.
    pub async fn send(&self, message: Message) -> anyhow::Result<()> {
        // Try to send email respecting the throttle delay.
        let mut interval = self.throttle_interval.lock().await;
        interval.tick().await;

        let result = self.transport.send_email(message).await;
        interval.reset();

        result?;
        debug!("Email has been successfully handed over to the SMTP server.");

        Ok(())
    }
}
