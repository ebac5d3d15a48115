use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a background task.
///
/// `Queued -> Processing -> Finished`, with `Aborted` reachable from any non-terminal state.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    #[default]
    Queued,
    Processing,
    Finished,
    Aborted,
}

impl TaskState {
    /// Single character code the state is persisted as.
    pub fn code(&self) -> char {
        match self {
            Self::Queued => 'Q',
            Self::Processing => 'P',
            Self::Finished => 'F',
            Self::Aborted => 'A',
        }
    }

    /// Parses the persisted single character code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'Q' => Some(Self::Queued),
            'P' => Some(Self::Processing),
            'F' => Some(Self::Finished),
            'A' => Some(Self::Aborted),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Aborted)
    }

    /// Checks whether the state machine allows moving to `next`.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Processing)
                | (Self::Processing, Self::Finished)
                | (Self::Queued | Self::Processing, Self::Aborted)
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Queued => "QUEUED",
            Self::Processing => "PROCESSING",
            Self::Finished => "FINISHED",
            Self::Aborted => "ABORTED",
        })
    }
}
