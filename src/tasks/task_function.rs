use crate::tasks::TaskError;

/// Functions the worker can dispatch a task to, identified by a numeric id that is stored with
/// the task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TaskFunction {
    /// Does nothing, the default function of a task.
    Noop,
    /// Sends the invitation referenced by the task payload.
    SendInvite,
    /// Logs the name of the task.
    Echo,
}

impl TaskFunction {
    /// Numeric id of the function.
    pub fn id(&self) -> u16 {
        match self {
            Self::Noop => 0,
            Self::SendInvite => 1,
            Self::Echo => 2,
        }
    }
}

impl TryFrom<u16> for TaskFunction {
    type Error = TaskError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Noop),
            1 => Ok(Self::SendInvite),
            2 => Ok(Self::Echo),
            id => Err(TaskError::UnknownFunction(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskFunction;
    use crate::tasks::TaskError;

    #[test]
    fn dispatches_by_id() {
        for function in [TaskFunction::Noop, TaskFunction::SendInvite, TaskFunction::Echo] {
            assert_eq!(TaskFunction::try_from(function.id()), Ok(function));
        }

        assert_eq!(TaskFunction::Noop.id(), 0);
        assert_eq!(TaskFunction::SendInvite.id(), 1);
        assert_eq!(TaskFunction::Echo.id(), 2);
        assert_eq!(
            TaskFunction::try_from(3),
            Err(TaskError::UnknownFunction(3))
        );
        assert_eq!(
            TaskError::UnknownFunction(3).to_string(),
            "Task function with id 3 doesn't exist."
        );
    }
}
