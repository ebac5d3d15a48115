use serde::Serialize;

/// Server status.
#[derive(Clone, Serialize)]
pub struct Status {
    /// Version of the server.
    pub version: String,
}
