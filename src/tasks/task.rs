use crate::tasks::{TaskError, TaskFunction};
use clubroll_types::tasks::TaskState;
use time::OffsetDateTime;

/// Defines a task.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Task {
    /// Unique id of the task, `0` until the task is stored.
    pub id: i64,
    /// Human readable name of the task.
    pub name: String,
    /// The time at which the task was queued, in UTC.
    pub arrived_at: OffsetDateTime,
    /// The time at which the task left the worker, in UTC.
    pub exited_at: Option<OffsetDateTime>,
    pub state: TaskState,
    /// Id of the function the task is dispatched to, see `TaskFunction`.
    pub function_id: u16,
}

impl Task {
    /// Creates a queued task.
    pub fn new(name: impl Into<String>, function: TaskFunction, arrived_at: OffsetDateTime) -> Self {
        Self {
            id: 0,
            name: name.into(),
            arrived_at,
            exited_at: None,
            state: TaskState::Queued,
            function_id: function.id(),
        }
    }

    /// Marks the task as being processed.
    pub fn start(&mut self) -> Result<(), TaskError> {
        self.transition_to(TaskState::Processing)
    }

    /// Marks the task as successfully processed.
    pub fn finish(&mut self, now: OffsetDateTime) -> Result<(), TaskError> {
        self.transition_to(TaskState::Finished)?;
        self.exited_at = Some(now);
        Ok(())
    }

    /// Marks the task as failed.
    pub fn abort(&mut self, now: OffsetDateTime) -> Result<(), TaskError> {
        self.transition_to(TaskState::Aborted)?;
        self.exited_at = Some(now);
        Ok(())
    }

    fn transition_to(&mut self, state: TaskState) -> Result<(), TaskError> {
        if !self.state.can_transition_to(state) {
            return Err(TaskError::InvalidTransition {
                from: self.state,
                to: state,
            });
        }

        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::tasks::{TaskError, TaskFunction};
    use clubroll_types::tasks::TaskState;
    use insta::assert_debug_snapshot;
    use time::OffsetDateTime;

    #[test]
    fn creates_queued_tasks() -> anyhow::Result<()> {
        assert_debug_snapshot!(Task::new(
            "Send invitation to dev@clubroll.dev",
            TaskFunction::SendInvite,
            OffsetDateTime::from_unix_timestamp(946720800)?
        ), @r###"
        Task {
            id: 0,
            name: "Send invitation to dev@clubroll.dev",
            arrived_at: 2000-01-01 10:00:00.0 +00:00:00,
            exited_at: None,
            state: Queued,
            function_id: 1,
        }
        "###);

        Ok(())
    }

    #[test]
    fn can_be_started_and_finished() -> anyhow::Result<()> {
        let now = OffsetDateTime::from_unix_timestamp(946720800)?;
        let mut task = Task::new("echo", TaskFunction::Echo, now);

        task.start()?;
        assert_eq!(task.state, TaskState::Processing);
        assert_eq!(task.exited_at, None);

        task.finish(now)?;
        assert_eq!(task.state, TaskState::Finished);
        assert_eq!(task.exited_at, Some(now));

        Ok(())
    }

    #[test]
    fn can_be_aborted_before_exit() -> anyhow::Result<()> {
        let now = OffsetDateTime::from_unix_timestamp(946720800)?;

        let mut queued = Task::new("noop", TaskFunction::Noop, now);
        queued.abort(now)?;
        assert_eq!(queued.state, TaskState::Aborted);
        assert_eq!(queued.exited_at, Some(now));

        let mut processing = Task::new("noop", TaskFunction::Noop, now);
        processing.start()?;
        processing.abort(now)?;
        assert_eq!(processing.state, TaskState::Aborted);

        Ok(())
    }

    #[test]
    fn rejects_invalid_transitions() -> anyhow::Result<()> {
        let now = OffsetDateTime::from_unix_timestamp(946720800)?;
        let mut task = Task::new("noop", TaskFunction::Noop, now);

        assert_eq!(
            task.finish(now),
            Err(TaskError::InvalidTransition {
                from: TaskState::Queued,
                to: TaskState::Finished
            })
        );
        assert_eq!(task.state, TaskState::Queued);
        assert_eq!(task.exited_at, None);

        task.start()?;
        assert!(task.start().is_err());
        task.finish(now)?;

        let err = task.abort(now).unwrap_err();
        assert_eq!(err.to_string(), "Task cannot move from FINISHED to ABORTED state.");
        assert_eq!(task.state, TaskState::Finished);

        Ok(())
    }
}
