use crate::{api::Api, invitations::Invitation, tasks::Email};
use anyhow::anyhow;
use serde_json::json;

/// Subject of the invitation emails.
pub const INVITATION_EMAIL_SUBJECT: &str = "You're invited to join the club!";

/// Compiles the email that delivers the invitation code to the invitee.
pub fn compile_invitation_email(api: &Api, invitation: &Invitation) -> anyhow::Result<Email> {
    let home_link = api.config.public_url.as_str();
    // Public URL can be hosted under a sub-path, e.g. `https://clubroll.dev/club`.
    let mut link = api.config.public_url.clone();
    link.path_segments_mut()
        .map_err(|_| anyhow!("Public URL '{home_link}' cannot be a base URL."))?
        .pop_if_empty()
        .extend(["members", "registration"]);
    link.query_pairs_mut().append_pair("i", &invitation.code);

    let valid_for = humantime::format_duration(api.config.invitations.valid_duration).to_string();
    let contact = api.config.invitations.contact.as_str();

    Ok(Email::html(
        INVITATION_EMAIL_SUBJECT,
        format!(
            "Hi {}, you've been invited to register as a club member. Visit {link} to complete your registration. The invitation expires in {valid_for}. If you have any questions, reach out to us at {contact}.",
            invitation.mail_address
        ),
        api.templates.render(
            "invitation_email",
            &json!({
                "email": invitation.mail_address,
                "link": link.as_str(),
                "home_link": home_link,
                "valid_for": valid_for,
                "contact": contact,
            }),
        )?,
    ))
}

#[cfg(test)]
mod tests {
    use super::compile_invitation_email;
    use crate::{
        config::Config,
        invitations::Invitation,
        tests::{mock_api, mock_api_with_config, mock_config},
    };
    use insta::assert_debug_snapshot;
    use sqlx::SqlitePool;
    use time::OffsetDateTime;
    use url::Url;

    fn mock_invitation() -> anyhow::Result<Invitation> {
        Ok(Invitation {
            id: 1,
            code: "INVABC1234".to_string(),
            mail_address: "dev@clubroll.dev".to_string(),
            created_at: OffsetDateTime::from_unix_timestamp(946720800)?,
            sent_at: None,
            accepted: false,
        })
    }

    #[sqlx::test]
    async fn can_compile_invitation_email(pool: SqlitePool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let email = compile_invitation_email(&api, &mock_invitation()?)?;
        assert_eq!(email.subject, "You're invited to join the club!");
        assert_debug_snapshot!(email.text, @r###""Hi dev@clubroll.dev, you've been invited to register as a club member. Visit http://localhost:1234/members/registration?i=INVABC1234 to complete your registration. The invitation expires in 3days. If you have any questions, reach out to us at club@clubroll.dev.""###);

        let html = email.html.unwrap_or_default();
        assert!(html.contains("Hi dev@clubroll.dev, you've been invited"));
        assert!(html.contains("http://localhost:1234/members/registration?i&#x3D;INVABC1234"));
        assert!(html.contains("club@clubroll.dev"));
        assert!(html.contains("3days"));

        Ok(())
    }

    #[sqlx::test]
    async fn keeps_public_url_path(pool: SqlitePool) -> anyhow::Result<()> {
        for public_url in ["https://clubroll.dev/club", "https://clubroll.dev/club/"] {
            let api = mock_api_with_config(
                pool.clone(),
                Config {
                    public_url: Url::parse(public_url)?,
                    ..mock_config()?
                },
            )
            .await?;

            let email = compile_invitation_email(&api, &mock_invitation()?)?;
            assert!(
                email.text.contains(
                    "Visit https://clubroll.dev/club/members/registration?i=INVABC1234 to complete"
                ),
                "{public_url}: {}",
                email.text
            );
        }

        Ok(())
    }
}
