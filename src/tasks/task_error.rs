use clubroll_types::tasks::TaskState;
use thiserror::Error;

/// Errors that fail a task and make the worker abort it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task function with id {0} doesn't exist.")]
    UnknownFunction(u16),
    #[error("Task cannot move from {from} to {to} state.")]
    InvalidTransition { from: TaskState, to: TaskState },
    #[error("Invitation is not set.")]
    InvitationNotSet,
    #[error("SMTP is not configured.")]
    SmtpNotConfigured,
}
