mod raw_invitation;

use crate::{
    database::{is_unique_violation, Database},
    error::Error as ClubrollError,
    invitations::Invitation,
    tasks::{insert_send_invite_task, Task, TaskFunction},
};
use anyhow::{anyhow, bail};
use raw_invitation::RawInvitation;
use sqlx::{query, query_as, Pool, Sqlite, SqliteConnection};
use std::time::Duration;
use time::OffsetDateTime;

/// A database extension for the invitations-related operations.
pub struct InvitationsDatabaseExt<'pool> {
    pool: &'pool Pool<Sqlite>,
}

impl<'pool> InvitationsDatabaseExt<'pool> {
    pub fn new(pool: &'pool Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Retrieves all invitations, newest first.
    pub async fn get_invitations(&self) -> anyhow::Result<Vec<Invitation>> {
        let raw_invitations = query_as::<_, RawInvitation>(
            r#"SELECT * FROM invitations ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(self.pool)
        .await?;

        let mut invitations = vec![];
        for raw_invitation in raw_invitations {
            invitations.push(Invitation::try_from(raw_invitation)?);
        }

        Ok(invitations)
    }

    /// Retrieves invitation with the specified ID.
    pub async fn get_invitation(&self, id: i64) -> anyhow::Result<Option<Invitation>> {
        query_as::<_, RawInvitation>(r#"SELECT * FROM invitations WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Invitation::try_from)
            .transpose()
    }

    /// Retrieves invitation with the specified code.
    pub async fn get_invitation_by_code(&self, code: &str) -> anyhow::Result<Option<Invitation>> {
        query_as::<_, RawInvitation>(r#"SELECT * FROM invitations WHERE code = ?1"#)
            .bind(code)
            .fetch_optional(self.pool)
            .await?
            .map(Invitation::try_from)
            .transpose()
    }

    /// Retrieves invitation issued for the specified mail address, the lookup is case-insensitive.
    pub async fn get_invitation_by_mail(
        &self,
        mail_address: &str,
    ) -> anyhow::Result<Option<Invitation>> {
        query_as::<_, RawInvitation>(r#"SELECT * FROM invitations WHERE mail_address = ?1"#)
            .bind(mail_address)
            .fetch_optional(self.pool)
            .await?
            .map(Invitation::try_from)
            .transpose()
    }

    /// Inserts invitations together with the tasks that send them, either everything is stored
    /// or nothing is. Returns invitations with the assigned IDs.
    pub async fn insert_invitations_with_send_tasks(
        &self,
        invitations: &[Invitation],
    ) -> anyhow::Result<Vec<Invitation>> {
        let mut tx = self.pool.begin().await?;

        let mut inserted_invitations = Vec::with_capacity(invitations.len());
        for invitation in invitations {
            let id = insert_invitation(&mut tx, invitation).await?;
            let task = Task::new(
                format!("Send invitation to {}", invitation.mail_address),
                TaskFunction::SendInvite,
                invitation.created_at,
            );
            insert_send_invite_task(&mut tx, &task, Some(id)).await?;

            inserted_invitations.push(Invitation {
                id,
                ..invitation.clone()
            });
        }

        tx.commit().await?;

        Ok(inserted_invitations)
    }

    /// Inserts invitation and returns its ID.
    pub async fn insert_invitation(&self, invitation: &Invitation) -> anyhow::Result<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_invitation(&mut conn, invitation).await
    }

    /// Updates the mutable parts of the invitation: sent date and acceptance.
    pub async fn update_invitation(&self, invitation: &Invitation) -> anyhow::Result<()> {
        let result = query(r#"UPDATE invitations SET sent_at = ?2, accepted = ?3 WHERE id = ?1"#)
            .bind(invitation.id)
            .bind(invitation.sent_at)
            .bind(invitation.accepted)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            bail!(ClubrollError::client(format!(
                "An invitation ('{}') doesn't exist.",
                invitation.id
            )));
        }

        Ok(())
    }

    /// Removes invitation with the specified ID, the send tasks keep the history without it.
    pub async fn remove_invitation(&self, id: i64) -> anyhow::Result<()> {
        query(r#"DELETE FROM invitations WHERE id = ?1"#)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Removes invitations that haven't been accepted within the validity window. Returns the
    /// number of removed invitations.
    pub async fn remove_expired_invitations(
        &self,
        now: OffsetDateTime,
        valid_duration: Duration,
    ) -> anyhow::Result<u64> {
        let valid_since = now - valid_duration;
        let result = query(
            r#"
DELETE FROM invitations
WHERE accepted = FALSE AND unixepoch(COALESCE(sent_at, created_at)) <= unixepoch(?1)
            "#,
        )
        .bind(valid_since)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Inserts invitation using the specified connection.
async fn insert_invitation(
    conn: &mut SqliteConnection,
    invitation: &Invitation,
) -> anyhow::Result<i64> {
    let result = query(
        r#"
INSERT INTO invitations (code, mail_address, created_at, sent_at, accepted)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
        "#,
    )
    .bind(&invitation.code)
    .bind(&invitation.mail_address)
    .bind(invitation.created_at)
    .bind(invitation.sent_at)
    .bind(invitation.accepted)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(result) => Ok(result.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => bail!(ClubrollError::client_with_root_cause(
            anyhow!(err).context(format!(
                "An invitation for '{}' already exists.",
                invitation.mail_address
            ))
        )),
        Err(err) => bail!(ClubrollError::from(anyhow!(err).context(format!(
            "Couldn't create invitation for '{}' due to unknown reason.",
            invitation.mail_address
        )))),
    }
}

/// Marks invitation as accepted using the specified connection, so that it can be done in the same
/// transaction as the registration.
pub(crate) async fn accept_invitation(conn: &mut SqliteConnection, id: i64) -> anyhow::Result<()> {
    let result = query(r#"UPDATE invitations SET accepted = TRUE WHERE id = ?1 AND accepted = FALSE"#)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        bail!(ClubrollError::client(
            "This invitation code was already accepted! Please contact club authorities if this was not done by you."
        ));
    }

    Ok(())
}

impl Database {
    /// Returns a database extension for the invitations operations.
    pub fn invitations(&self) -> InvitationsDatabaseExt<'_> {
        InvitationsDatabaseExt::new(&self.pool)
    }
}
