use crate::{
    error::Error as ClubrollError,
    forms::FormErrors,
    members::MemberRegistrationParams,
    server::{handlers::registration_get::render_registration_form, ServerState},
};
use actix_web::{http::header, http::StatusCode, post, web, HttpResponse};
use tracing::error;

/// Registers a new member and redirects to the home page, or renders the form back with the
/// validation errors.
#[post("/members/registration")]
pub async fn registration_post(
    state: web::Data<ServerState>,
    form: web::Form<MemberRegistrationParams>,
) -> Result<HttpResponse, ClubrollError> {
    let form = form.into_inner();
    match state.api.members().register(form.clone()).await {
        Ok(_) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .finish()),
        Err(err) => match err.downcast::<FormErrors>() {
            Ok(errors) => {
                render_registration_form(&state, StatusCode::BAD_REQUEST, &form, &errors)
            }
            Err(err) => {
                error!("Failed to register member: {err:?}");
                Err(err.into())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        invitations::InvitationsCreateParams,
        server::{
            handlers::registration_post::registration_post, server_state::tests::mock_server_state,
        },
    };
    use actix_web::{
        body::MessageBody,
        http::{header, Method},
        test::{call_service, init_service, TestRequest},
        web, App,
    };
    use sqlx::SqlitePool;
    use std::str::from_utf8;

    #[sqlx::test]
    async fn registers_member(pool: SqlitePool) -> anyhow::Result<()> {
        let state = web::Data::new(mock_server_state(pool).await?);
        let app = init_service(App::new().app_data(state.clone()).service(registration_post)).await;
        let invitation = state
            .api
            .invitations()
            .create_invitations(InvitationsCreateParams {
                mail_list: Some("ada@clubroll.dev".to_string()),
                csv_file: None,
            })
            .await?
            .remove(0);

        let response = call_service(
            &app,
            TestRequest::with_uri("/members/registration")
                .method(Method::POST)
                .set_form([
                    ("invitation_code", invitation.code.as_str()),
                    ("first_name", "Ada"),
                    ("last_name", "Lovelace"),
                    ("email", "ada@clubroll.dev"),
                    ("roll", "22BECSE44"),
                    ("contact", "+91 96123 45678"),
                    ("programme", "CSE"),
                    ("semester", "8"),
                    ("about", ""),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), 303);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        let member = state
            .api
            .members()
            .get_member_by_email("ada@clubroll.dev")
            .await?
            .unwrap();
        assert_eq!(member.contact, "+919612345678");

        Ok(())
    }

    #[sqlx::test]
    async fn renders_validation_errors(pool: SqlitePool) -> anyhow::Result<()> {
        let state = web::Data::new(mock_server_state(pool).await?);
        let app = init_service(App::new().app_data(state.clone()).service(registration_post)).await;

        let response = call_service(
            &app,
            TestRequest::with_uri("/members/registration")
                .method(Method::POST)
                .set_form([
                    ("invitation_code", "INVUNKNOWN"),
                    ("first_name", "Ada"),
                    ("last_name", "Lovelace"),
                    ("email", "ada@clubroll.dev"),
                    ("roll", "22BECCS44"),
                    ("contact", "+91 96123 45678"),
                    ("programme", "CSE"),
                    ("semester", "8"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), 400);

        let body = response.into_body().try_into_bytes().unwrap();
        let page = from_utf8(&body)?;
        assert!(page.contains("Invalid invitation code! Please contact club authorities for more information."));
        assert!(page.contains("Roll number doesn&#x27;t match the roll-format of the selected programme."));
        // Submitted values are kept.
        assert!(page.contains(r#"value="Lovelace""#));
        assert!(page.contains(r#"<option value="CSE" selected>"#));
        assert!(page.contains(r#"<option value="8" selected>"#));

        assert!(state.api.members().get_members().await?.is_empty());

        Ok(())
    }
}
