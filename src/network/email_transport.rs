use lettre::{AsyncTransport, Message};
use std::{future::Future, pin::Pin};

/// Boxed future returned by the email transports.
pub type SendEmailFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Object safe seam over the lettre async transports, so that the rest of the server doesn't need
/// to be generic over the transport type.
pub trait EmailTransport: Send + Sync {
    /// Sends the specified email message.
    fn send_email(&self, message: Message) -> SendEmailFuture<'_>;
}

impl<T> EmailTransport for T
where
    T: AsyncTransport + Send + Sync,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    fn send_email(&self, message: Message) -> SendEmailFuture<'_> {
        Box::pin(async move {
            self.send(message).await?;
            Ok(())
        })
    }
}
