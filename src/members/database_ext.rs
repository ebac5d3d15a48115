mod raw_member;

use crate::{
    database::{is_unique_violation, Database},
    error::Error as ClubrollError,
    invitations::accept_invitation,
    members::Member,
    users::{insert_user, User},
};
use anyhow::{anyhow, bail};
use raw_member::RawMember;
use sqlx::{query, query_as, Pool, Sqlite, SqliteConnection};

/// A database extension for the members-related operations.
pub struct MembersDatabaseExt<'pool> {
    pool: &'pool Pool<Sqlite>,
}

impl<'pool> MembersDatabaseExt<'pool> {
    pub fn new(pool: &'pool Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Retrieves all members in the order they joined.
    pub async fn get_members(&self) -> anyhow::Result<Vec<Member>> {
        let raw_members =
            query_as::<_, RawMember>(r#"SELECT * FROM members ORDER BY joined_at, id"#)
                .fetch_all(self.pool)
                .await?;

        let mut members = vec![];
        for raw_member in raw_members {
            members.push(Member::try_from(raw_member)?);
        }

        Ok(members)
    }

    /// Retrieves member with the specified ID.
    pub async fn get_member(&self, id: i64) -> anyhow::Result<Option<Member>> {
        query_as::<_, RawMember>(r#"SELECT * FROM members WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Member::try_from)
            .transpose()
    }

    /// Retrieves member with the specified email, the lookup is case-insensitive.
    pub async fn get_member_by_email(&self, email: &str) -> anyhow::Result<Option<Member>> {
        query_as::<_, RawMember>(r#"SELECT * FROM members WHERE email = ?1"#)
            .bind(email)
            .fetch_optional(self.pool)
            .await?
            .map(Member::try_from)
            .transpose()
    }

    /// Retrieves member with the specified roll number, the lookup is case-insensitive.
    pub async fn get_member_by_roll(&self, roll: &str) -> anyhow::Result<Option<Member>> {
        query_as::<_, RawMember>(r#"SELECT * FROM members WHERE roll = ?1"#)
            .bind(roll)
            .fetch_optional(self.pool)
            .await?
            .map(Member::try_from)
            .transpose()
    }

    /// Retrieves member with the specified normalized phone number.
    pub async fn get_member_by_contact(&self, contact: &str) -> anyhow::Result<Option<Member>> {
        query_as::<_, RawMember>(r#"SELECT * FROM members WHERE contact = ?1"#)
            .bind(contact)
            .fetch_optional(self.pool)
            .await?
            .map(Member::try_from)
            .transpose()
    }

    /// Stores the user, the member paired with it and marks the invitation as accepted. Either
    /// everything is stored or nothing is. Returns IDs of the user and the member.
    pub async fn register_member(
        &self,
        user: &User,
        member: &Member,
        invitation_id: i64,
    ) -> anyhow::Result<(i64, i64)> {
        let mut tx = self.pool.begin().await?;

        let user_id = insert_user(&mut tx, user).await?;
        let member_id = insert_member(
            &mut tx,
            &Member {
                user_id: Some(user_id),
                ..member.clone()
            },
        )
        .await?;
        accept_invitation(&mut tx, invitation_id).await?;

        tx.commit().await?;

        Ok((user_id, member_id))
    }

    /// Inserts member and returns its ID.
    pub async fn insert_member(&self, member: &Member) -> anyhow::Result<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_member(&mut conn, member).await
    }

    /// Updates the graduation status of the member.
    pub async fn update_member_graduation(
        &self,
        id: i64,
        has_graduated: bool,
    ) -> anyhow::Result<()> {
        let result = query(r#"UPDATE members SET has_graduated = ?2 WHERE id = ?1"#)
            .bind(id)
            .bind(has_graduated)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            bail!(ClubrollError::client(format!(
                "A member ('{id}') doesn't exist."
            )));
        }

        Ok(())
    }
}

/// Inserts member using the specified connection.
async fn insert_member(conn: &mut SqliteConnection, member: &Member) -> anyhow::Result<i64> {
    let result = query(
        r#"
INSERT INTO members (user_id, first_name, last_name, email, roll, about, contact, programme, semester, has_graduated, profile_pic, joined_at)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12 )
        "#,
    )
    .bind(member.user_id)
    .bind(&member.first_name)
    .bind(&member.last_name)
    .bind(&member.email)
    .bind(&member.roll)
    .bind(&member.about)
    .bind(&member.contact)
    .bind(member.programme.tag())
    .bind(i64::from(member.semester.number()))
    .bind(member.has_graduated)
    .bind(&member.profile_pic)
    .bind(member.joined_at)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(result) => Ok(result.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => bail!(ClubrollError::client_with_root_cause(
            anyhow!(err).context(format!(
                "Member with such email ('{}'), roll number ('{}') or phone number ('{}') already exists.",
                member.email, member.roll, member.contact
            ))
        )),
        Err(err) => bail!(ClubrollError::from(anyhow!(err).context(format!(
            "Couldn't create member ('{}') due to unknown reason.",
            member.email
        )))),
    }
}

impl Database {
    /// Returns a database extension for the members operations.
    pub fn members(&self) -> MembersDatabaseExt<'_> {
        MembersDatabaseExt::new(&self.pool)
    }
}
