use crate::tasks::Task;

/// Task that sends an invitation email. The invitation is `None` if it was removed after the task
/// was queued.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SendInviteTask {
    pub task: Task,
    pub invitation_id: Option<i64>,
}
