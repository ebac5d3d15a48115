mod error_kind;

pub use self::error_kind::ErrorKind;
use actix_web::{
    http::{header, StatusCode},
    HttpResponse, HttpResponseBuilder, ResponseError,
};
use anyhow::anyhow;
use std::fmt::{Debug, Display, Formatter};

/// Realm reported to clients that need to authenticate.
const AUTHENTICATION_REALM: &str = r#"Basic realm="clubroll""#;

/// Application specific error type.
pub struct Error {
    root_cause: anyhow::Error,
    kind: ErrorKind,
}

impl Error {
    /// Creates a Client error instance with the given root cause.
    pub fn client_with_root_cause(root_cause: anyhow::Error) -> Self {
        Self {
            root_cause,
            kind: ErrorKind::ClientError,
        }
    }

    /// Creates a Client error instance with the given message.
    pub fn client<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self::client_with_root_cause(anyhow!(message))
    }

    /// Creates an error for the requests without valid credentials.
    pub fn unauthorized<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::Unauthorized,
        }
    }

    /// Creates an error for the requests that aren't allowed to access a resource.
    pub fn access_forbidden() -> Self {
        Self {
            root_cause: anyhow!("Access forbidden."),
            kind: ErrorKind::AccessForbidden,
        }
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::ClientError => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::AccessForbidden => StatusCode::FORBIDDEN,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponseBuilder::new(self.status_code());
        if self.kind == ErrorKind::Unauthorized {
            response.insert_header((header::WWW_AUTHENTICATE, AUTHENTICATION_REALM));
        }

        response.content_type("text/plain; charset=utf-8").body(match self.kind {
            ErrorKind::Unknown => "Internal Server Error".to_string(),
            _ => self.root_cause.to_string(),
        })
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.root_cause, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.root_cause, f)
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        err.downcast::<Error>().unwrap_or_else(|root_cause| Self {
            root_cause,
            kind: ErrorKind::Unknown,
        })
    }
}
