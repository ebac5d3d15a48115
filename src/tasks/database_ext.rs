mod raw_task;

use crate::{
    database::Database,
    error::Error as ClubrollError,
    tasks::{SendInviteTask, Task},
};
use anyhow::bail;
use raw_task::RawTask;
use sqlx::{query, query_as, FromRow, Pool, Row, Sqlite, SqliteConnection};
use tracing::error;

/// A database extension for the tasks-related operations.
pub struct TasksDatabaseExt<'pool> {
    pool: &'pool Pool<Sqlite>,
}

impl<'pool> TasksDatabaseExt<'pool> {
    pub fn new(pool: &'pool Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Retrieves task from the database using ID.
    pub async fn get_task(&self, id: i64) -> anyhow::Result<Option<Task>> {
        query_as::<_, RawTask>(r#"SELECT * FROM tasks WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    /// Retrieves send invite task together with its payload using task ID.
    pub async fn get_send_invite_task(&self, id: i64) -> anyhow::Result<Option<SendInviteTask>> {
        let Some(task) = self.get_task(id).await? else {
            return Ok(None);
        };

        let Some(payload) = query(r#"SELECT invitation_id FROM send_invite_tasks WHERE task_id = ?1"#)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(SendInviteTask {
            task,
            invitation_id: payload.try_get("invitation_id")?,
        }))
    }

    /// Retrieves the oldest queued task. A task row that cannot be decoded is aborted right away,
    /// so that it doesn't block the tasks queued after it.
    pub async fn get_next_queued_task(&self) -> anyhow::Result<Option<Task>> {
        let Some(row) = query(
            r#"
SELECT * FROM tasks
WHERE state = 'Q'
ORDER BY arrived_at, id
LIMIT 1
            "#,
        )
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let task = RawTask::from_row(&row)
            .map_err(anyhow::Error::from)
            .and_then(Task::try_from);
        match task {
            Ok(task) => Ok(Some(task)),
            Err(err) => {
                let id = row.try_get::<i64, _>("id")?;
                query(r#"UPDATE tasks SET state = 'A', exited_at = ?2 WHERE id = ?1"#)
                    .bind(id)
                    .bind(Database::utc_now()?)
                    .execute(self.pool)
                    .await?;
                error!(task.id = id, "Aborted malformed task: {err:?}");

                Err(err.context(format!("Task ('{id}') is malformed and has been aborted.")))
            }
        }
    }

    /// Inserts a new task to the database and returns its ID.
    pub async fn insert_task(&self, task: &Task) -> anyhow::Result<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_task(&mut conn, task).await
    }

    /// Inserts a new send invite task with its payload and returns its ID.
    pub async fn insert_send_invite_task(
        &self,
        task: &Task,
        invitation_id: Option<i64>,
    ) -> anyhow::Result<i64> {
        let mut tx = self.pool.begin().await?;
        let id = insert_send_invite_task(&mut tx, task, invitation_id).await?;
        tx.commit().await?;

        Ok(id)
    }

    /// Updates the lifecycle part of the task: state and exit date.
    pub async fn update_task(&self, task: &Task) -> anyhow::Result<()> {
        let result = query(r#"UPDATE tasks SET state = ?2, exited_at = ?3 WHERE id = ?1"#)
            .bind(task.id)
            .bind(task.state.code().to_string())
            .bind(task.exited_at)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            bail!(ClubrollError::client(format!(
                "A task ('{}') doesn't exist.",
                task.id
            )));
        }

        Ok(())
    }
}

/// Inserts a new task using the specified connection.
async fn insert_task(conn: &mut SqliteConnection, task: &Task) -> anyhow::Result<i64> {
    let result = query(
        r#"
INSERT INTO tasks (name, arrived_at, exited_at, state, function_id)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
        "#,
    )
    .bind(&task.name)
    .bind(task.arrived_at)
    .bind(task.exited_at)
    .bind(task.state.code().to_string())
    .bind(i64::from(task.function_id))
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Inserts a new send invite task with its payload using the specified connection, so that it can
/// be queued in the same transaction the invitation is created in.
pub(crate) async fn insert_send_invite_task(
    conn: &mut SqliteConnection,
    task: &Task,
    invitation_id: Option<i64>,
) -> anyhow::Result<i64> {
    let id = insert_task(conn, task).await?;
    query(r#"INSERT INTO send_invite_tasks (task_id, invitation_id) VALUES ( ?1, ?2 )"#)
        .bind(id)
        .bind(invitation_id)
        .execute(&mut *conn)
        .await?;

    Ok(id)
}

impl Database {
    /// Returns a database extension for the tasks operations.
    pub fn tasks(&self) -> TasksDatabaseExt<'_> {
        TasksDatabaseExt::new(&self.pool)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::Database,
        error::Error as ClubrollError,
        tasks::{Task, TaskFunction},
    };
    use clubroll_types::tasks::TaskState;
    use insta::assert_debug_snapshot;
    use sqlx::{query, Row, SqlitePool};
    use time::OffsetDateTime;

    #[sqlx::test]
    async fn can_add_and_retrieve_tasks(pool: SqlitePool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;
        assert!(db.tasks().get_task(1).await?.is_none());

        let id = db
            .tasks()
            .insert_task(&Task::new(
                "echo",
                TaskFunction::Echo,
                OffsetDateTime::from_unix_timestamp(946720800)?,
            ))
            .await?;

        assert_debug_snapshot!(db.tasks().get_task(id).await?, @r###"
        Some(
            Task {
                id: 1,
                name: "echo",
                arrived_at: 2000-01-01 10:00:00.0 +00:00:00,
                exited_at: None,
                state: Queued,
                function_id: 2,
            },
        )
        "###);

        // Not a send invite task.
        assert!(db.tasks().get_send_invite_task(id).await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn can_add_send_invite_tasks(pool: SqlitePool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;

        let id = db
            .tasks()
            .insert_send_invite_task(
                &Task::new(
                    "Send invitation",
                    TaskFunction::SendInvite,
                    OffsetDateTime::from_unix_timestamp(946720800)?,
                ),
                None,
            )
            .await?;

        assert_debug_snapshot!(db.tasks().get_send_invite_task(id).await?, @r###"
        Some(
            SendInviteTask {
                task: Task {
                    id: 1,
                    name: "Send invitation",
                    arrived_at: 2000-01-01 10:00:00.0 +00:00:00,
                    exited_at: None,
                    state: Queued,
                    function_id: 1,
                },
                invitation_id: None,
            },
        )
        "###);

        Ok(())
    }

    #[sqlx::test]
    async fn returns_queued_tasks_in_arrival_order(pool: SqlitePool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;
        assert!(db.tasks().get_next_queued_task().await?.is_none());

        let late = db
            .tasks()
            .insert_task(&Task::new(
                "late",
                TaskFunction::Noop,
                OffsetDateTime::from_unix_timestamp(946720900)?,
            ))
            .await?;
        let early = db
            .tasks()
            .insert_task(&Task::new(
                "early",
                TaskFunction::Noop,
                OffsetDateTime::from_unix_timestamp(946720800)?,
            ))
            .await?;
        let early_second = db
            .tasks()
            .insert_task(&Task::new(
                "early second",
                TaskFunction::Noop,
                OffsetDateTime::from_unix_timestamp(946720800)?,
            ))
            .await?;

        let mut processed = vec![];
        while let Some(mut task) = db.tasks().get_next_queued_task().await? {
            task.start()?;
            db.tasks().update_task(&task).await?;
            processed.push(task.id);
        }
        assert_eq!(processed, vec![early, early_second, late]);

        Ok(())
    }

    #[sqlx::test]
    async fn aborts_malformed_queued_tasks(pool: SqlitePool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;

        let malformed_id = query(
            r#"INSERT INTO tasks (name, arrived_at, state, function_id) VALUES ('malformed', '1999-13-45T25:61:00Z', 'Q', 2)"#,
        )
        .execute(&db.pool)
        .await?
        .last_insert_rowid();
        let id = db
            .tasks()
            .insert_task(&Task::new(
                "echo",
                TaskFunction::Echo,
                OffsetDateTime::from_unix_timestamp(946720800)?,
            ))
            .await?;

        let err = db.tasks().get_next_queued_task().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Task ('{malformed_id}') is malformed and has been aborted.")
        );

        let state = query(r#"SELECT state, exited_at IS NOT NULL AS has_exited FROM tasks WHERE id = ?1"#)
            .bind(malformed_id)
            .fetch_one(&db.pool)
            .await?;
        assert_eq!(state.try_get::<String, _>("state")?, "A");
        assert!(state.try_get::<bool, _>("has_exited")?);

        // The queue moves on to the next task.
        assert_eq!(
            db.tasks().get_next_queued_task().await?.map(|task| task.id),
            Some(id)
        );

        Ok(())
    }

    #[sqlx::test]
    async fn rejects_out_of_range_function_ids(pool: SqlitePool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;

        for function_id in [-1, 65536, 70000] {
            let result = query(
                r#"INSERT INTO tasks (name, arrived_at, state, function_id) VALUES ('bad', ?1, 'Q', ?2)"#,
            )
            .bind(OffsetDateTime::from_unix_timestamp(946720800)?)
            .bind(function_id)
            .execute(&db.pool)
            .await;
            assert!(result.is_err(), "function id {function_id} was accepted");
        }
        assert!(db.tasks().get_next_queued_task().await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn can_update_tasks(pool: SqlitePool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;
        let now = OffsetDateTime::from_unix_timestamp(946720800)?;

        let mut task = Task::new("noop", TaskFunction::Noop, now);
        task.id = db.tasks().insert_task(&task).await?;

        task.start()?;
        task.finish(now)?;
        db.tasks().update_task(&task).await?;

        let stored = db.tasks().get_task(task.id).await?;
        assert_eq!(stored.as_ref().map(|task| task.state), Some(TaskState::Finished));
        assert_eq!(stored, Some(task.clone()));

        let err = db
            .tasks()
            .update_task(&Task { id: 100, ..task })
            .await
            .unwrap_err()
            .downcast::<ClubrollError>()?;
        assert_eq!(err.to_string(), "A task ('100') doesn't exist.");

        Ok(())
    }
}
