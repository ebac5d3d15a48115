use crate::{
    api::Api,
    database::Database,
    invitations::{compile_invitation_email, Invitation},
    tasks::{Email, Task, TaskError, TaskFunction},
};
use anyhow::{bail, Context};
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    Message,
};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, error, info};

/// Describes the API to work with tasks.
pub struct TasksApi<'a> {
    api: &'a Api,
}

impl<'a> TasksApi<'a> {
    /// Creates Tasks API.
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Queues a new task that will be dispatched to the specified function.
    pub async fn schedule_task(
        &self,
        name: impl Into<String>,
        function: TaskFunction,
    ) -> anyhow::Result<Task> {
        let mut task = Task::new(name, function, Database::utc_now()?);
        task.id = self.api.db.tasks().insert_task(&task).await?;

        Ok(task)
    }

    /// Queues a new task that sends the specified invitation.
    pub async fn schedule_invite_task(&self, invitation: &Invitation) -> anyhow::Result<Task> {
        let mut task = Task::new(
            format!("Send invitation to {}", invitation.mail_address),
            TaskFunction::SendInvite,
            Database::utc_now()?,
        );
        task.id = self
            .api
            .db
            .tasks()
            .insert_send_invite_task(&task, Some(invitation.id))
            .await?;

        Ok(task)
    }

    /// Processes the oldest queued task, if any, and returns it in its final state. A task that
    /// fails is aborted, only errors of the task storage are returned.
    pub async fn process_next_task(&self) -> anyhow::Result<Option<Task>> {
        let Some(mut task) = self.api.db.tasks().get_next_queued_task().await? else {
            return Ok(None);
        };

        if let Err(err) = self.execute_task(&mut task).await {
            error!(
                task.id = task.id, task.name = %task.name, task.function_id = task.function_id,
                "Failed to execute task: {err:?}"
            );

            task.abort(Database::utc_now()?)?;
            self.api.db.tasks().update_task(&task).await?;
        } else {
            debug!(task.id = task.id, task.name = %task.name, "Successfully executed task.");
        }

        Ok(Some(task))
    }

    /// Processes queued tasks one by one forever, sleeping for `poll_interval` whenever the queue
    /// is empty or the tasks storage fails.
    pub async fn run(&self, poll_interval: Duration) {
        info!(
            "Started processing tasks (poll interval {}).",
            humantime::format_duration(poll_interval)
        );

        loop {
            match self.process_next_task().await {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                Err(err) => error!("Failed to process tasks: {err:?}"),
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Dispatches the task to its function and marks it as finished if the function succeeds.
    async fn execute_task(&self, task: &mut Task) -> anyhow::Result<()> {
        let function = TaskFunction::try_from(task.function_id)?;

        task.start()?;
        self.api.db.tasks().update_task(task).await?;

        debug!(task.id = task.id, task.function = ?function, "Executing task.");
        match function {
            TaskFunction::Noop => {}
            TaskFunction::SendInvite => self.send_invite(task).await?,
            TaskFunction::Echo => {
                info!(task.id = task.id, "Hello from task '{}'.", task.name);
            }
        }

        let mut finished_task = task.clone();
        finished_task.finish(Database::utc_now()?)?;
        self.api.db.tasks().update_task(&finished_task).await?;
        *task = finished_task;

        Ok(())
    }

    /// Sends the invitation referenced by the task and records when it was sent.
    async fn send_invite(&self, task: &Task) -> anyhow::Result<()> {
        let invitation_id = self
            .api
            .db
            .tasks()
            .get_send_invite_task(task.id)
            .await?
            .and_then(|send_invite_task| send_invite_task.invitation_id)
            .ok_or(TaskError::InvitationNotSet)?;
        let mut invitation = self
            .api
            .db
            .invitations()
            .get_invitation(invitation_id)
            .await?
            .ok_or(TaskError::InvitationNotSet)?;

        let email = compile_invitation_email(self.api, &invitation)?;
        let sent_at = Database::utc_now()?;
        self.send_email(task, &invitation.mail_address, email, sent_at)
            .await?;

        invitation.sent_at = Some(sent_at);
        self.api.db.invitations().update_invitation(&invitation).await?;

        info!(
            task.id = task.id,
            invitation.id = invitation.id,
            "Sent invitation email."
        );

        Ok(())
    }

    /// Send email using the configured SMTP server.
    async fn send_email(
        &self,
        task: &Task,
        to: &str,
        email: Email,
        timestamp: OffsetDateTime,
    ) -> anyhow::Result<()> {
        let Some(ref smtp) = self.api.network.smtp else {
            error!(task.id = task.id, "Email task cannot be executed since SMTP isn't configured.");
            bail!(TaskError::SmtpNotConfigured);
        };

        let message_builder = Message::builder()
            .from(smtp.config.username.parse()?)
            .reply_to(smtp.config.username.parse()?)
            .to(to
                .parse()
                .with_context(|| format!("Cannot parse TO address: {to}"))?)
            .subject(&email.subject)
            .date(timestamp.into());

        let message = match email.html {
            Some(html) => message_builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?,
            None => message_builder.body(email.text)?,
        };

        smtp.send(message).await
    }
}

impl Api {
    /// Returns an API to work with tasks.
    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi::new(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        invitations::InvitationsCreateParams,
        network::tests::MockEmailTransport,
        tasks::{Task, TaskFunction},
        tests::{mock_api, mock_api_with_smtp},
    };
    use clubroll_types::tasks::TaskState;
    use sqlx::{query, SqlitePool};
    use std::time::Duration;
    use time::OffsetDateTime;

    async fn create_invitation(api: &crate::api::Api, mail_address: &str) -> anyhow::Result<i64> {
        let invitations = api
            .invitations()
            .create_invitations(InvitationsCreateParams {
                mail_list: Some(mail_address.to_string()),
                csv_file: None,
            })
            .await?;

        Ok(invitations[0].id)
    }

    #[sqlx::test]
    async fn properly_schedules_tasks(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let task = api.tasks().schedule_task("echo", TaskFunction::Echo).await?;
        assert_eq!(task.state, TaskState::Queued);
        assert_eq!(task.function_id, 2);
        assert_eq!(api.db.tasks().get_task(task.id).await?, Some(task));

        Ok(())
    }

    #[sqlx::test]
    async fn processes_tasks_in_arrival_order(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;
        assert!(api.tasks().process_next_task().await?.is_none());

        let first = api.tasks().schedule_task("first", TaskFunction::Echo).await?;
        let second = api.tasks().schedule_task("second", TaskFunction::Noop).await?;

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.id, first.id);
        assert_eq!(processed.state, TaskState::Finished);
        assert!(processed.exited_at.is_some());
        assert_eq!(api.db.tasks().get_task(first.id).await?, Some(processed));

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.id, second.id);
        assert_eq!(processed.state, TaskState::Finished);

        assert!(api.tasks().process_next_task().await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn aborts_tasks_with_unknown_function(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let id = api
            .db
            .tasks()
            .insert_task(&Task {
                function_id: 42,
                ..Task::new("unknown", TaskFunction::Noop, OffsetDateTime::now_utc())
            })
            .await?;

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.id, id);
        assert_eq!(processed.state, TaskState::Aborted);
        assert_eq!(
            api.db.tasks().get_task(id).await?.map(|task| task.state),
            Some(TaskState::Aborted)
        );

        Ok(())
    }

    #[sqlx::test]
    async fn malformed_tasks_do_not_block_queue(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;
        query(
            r#"INSERT INTO tasks (name, arrived_at, state, function_id) VALUES ('malformed', '1999-13-45T25:61:00Z', 'Q', 2)"#,
        )
        .execute(&api.db.pool)
        .await?;
        let echo = api.tasks().schedule_task("echo", TaskFunction::Echo).await?;

        assert!(api.tasks().process_next_task().await.is_err());

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.id, echo.id);
        assert_eq!(processed.state, TaskState::Finished);
        assert!(api.tasks().process_next_task().await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn sends_invitations(pool: SqlitePool) -> anyhow::Result<()> {
        let transport = MockEmailTransport::default();
        let api = mock_api_with_smtp(pool, transport.clone()).await?;
        let invitation_id = create_invitation(&api, "dev@clubroll.dev").await?;

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.state, TaskState::Finished);

        let messages = transport.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].envelope().to()[0].to_string(), "dev@clubroll.dev");

        let formatted = String::from_utf8(messages[0].formatted())?;
        assert!(formatted.contains("Subject: You're invited to join the club!"));
        assert!(formatted.contains("Content-Type: multipart/alternative"));

        let invitation = api.db.invitations().get_invitation(invitation_id).await?.unwrap();
        assert!(invitation.sent_at.is_some());
        assert!(!invitation.accepted);

        Ok(())
    }

    #[sqlx::test]
    async fn can_schedule_invite_task_manually(pool: SqlitePool) -> anyhow::Result<()> {
        let transport = MockEmailTransport::default();
        let api = mock_api_with_smtp(pool, transport.clone()).await?;
        let invitation_id = create_invitation(&api, "dev@clubroll.dev").await?;
        let invitation = api.db.invitations().get_invitation(invitation_id).await?.unwrap();

        // Resend the same invitation.
        let task = api.tasks().schedule_invite_task(&invitation).await?;
        assert_eq!(task.name, "Send invitation to dev@clubroll.dev");
        assert_eq!(
            api.db
                .tasks()
                .get_send_invite_task(task.id)
                .await?
                .and_then(|task| task.invitation_id),
            Some(invitation_id)
        );

        api.tasks().process_next_task().await?;
        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.id, task.id);
        assert_eq!(processed.state, TaskState::Finished);
        assert_eq!(transport.messages().len(), 2);

        Ok(())
    }

    #[sqlx::test]
    async fn aborts_invite_tasks_without_invitation(pool: SqlitePool) -> anyhow::Result<()> {
        let transport = MockEmailTransport::default();
        let api = mock_api_with_smtp(pool, transport.clone()).await?;
        let invitation_id = create_invitation(&api, "dev@clubroll.dev").await?;
        api.invitations().remove_invitation(invitation_id).await?;

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.state, TaskState::Aborted);
        assert!(transport.messages().is_empty());

        // Task without any payload.
        api.tasks()
            .schedule_task("no payload", TaskFunction::SendInvite)
            .await?;
        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.state, TaskState::Aborted);

        Ok(())
    }

    #[sqlx::test]
    async fn aborts_invite_tasks_if_email_cannot_be_sent(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api_with_smtp(pool, MockEmailTransport::failing()).await?;
        let invitation_id = create_invitation(&api, "dev@clubroll.dev").await?;

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.state, TaskState::Aborted);

        let invitation = api.db.invitations().get_invitation(invitation_id).await?.unwrap();
        assert!(invitation.sent_at.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn aborts_invite_tasks_without_smtp(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;
        create_invitation(&api, "dev@clubroll.dev").await?;

        let processed = api.tasks().process_next_task().await?.unwrap();
        assert_eq!(processed.state, TaskState::Aborted);

        Ok(())
    }

    #[sqlx::test]
    async fn run_processes_queued_tasks(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;
        let first = api.tasks().schedule_task("first", TaskFunction::Echo).await?;
        let second = api.tasks().schedule_task("second", TaskFunction::Noop).await?;

        // The loop never returns on its own.
        let result = tokio::time::timeout(
            Duration::from_millis(300),
            api.tasks().run(Duration::from_millis(10)),
        )
        .await;
        assert!(result.is_err());

        for id in [first.id, second.id] {
            assert_eq!(
                api.db.tasks().get_task(id).await?.map(|task| task.state),
                Some(TaskState::Finished)
            );
        }

        Ok(())
    }
}
