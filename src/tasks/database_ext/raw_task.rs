use crate::tasks::Task;
use anyhow::anyhow;
use clubroll_types::tasks::TaskState;
use time::OffsetDateTime;

#[derive(sqlx::FromRow, Debug, Eq, PartialEq, Clone)]
pub(super) struct RawTask {
    pub id: i64,
    pub name: String,
    pub arrived_at: OffsetDateTime,
    pub exited_at: Option<OffsetDateTime>,
    pub state: String,
    pub function_id: i64,
}

impl TryFrom<RawTask> for Task {
    type Error = anyhow::Error;

    fn try_from(raw_task: RawTask) -> Result<Self, Self::Error> {
        let state = raw_task
            .state
            .chars()
            .next()
            .and_then(TaskState::from_code)
            .ok_or_else(|| anyhow!("Unknown task state '{}'.", raw_task.state))?;

        Ok(Task {
            id: raw_task.id,
            name: raw_task.name,
            arrived_at: raw_task.arrived_at,
            exited_at: raw_task.exited_at,
            state,
            function_id: u16::try_from(raw_task.function_id)?,
        })
    }
}
