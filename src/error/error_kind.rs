/// Describes an application specific error types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Error caused by the error on the client side.
    ClientError,
    /// Request didn't carry valid credentials.
    Unauthorized,
    /// Credentials are valid, but don't grant access to the resource.
    AccessForbidden,
    /// Unknown error.
    Unknown,
}
