use serde::Serialize;

/// Describes the email.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Email subject.
    pub subject: String,
    /// Email body in plain text (used as a fallback if `html` is specified).
    pub text: String,
    /// Email body in HTML.
    pub html: Option<String>,
}

impl Email {
    /// Create new HTML email with a plain-text fallback.
    pub fn html<S: Into<String>, T: Into<String>, H: Into<String>>(
        subject: S,
        text: T,
        html: H,
    ) -> Self {
        Self {
            subject: subject.into(),
            text: text.into(),
            html: Some(html.into()),
        }
    }
}
