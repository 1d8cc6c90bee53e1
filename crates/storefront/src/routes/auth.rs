//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the store API. The API
//! owns all credentials; this layer only stores the returned token and user
//! id in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use papaya_market_core::Email;

use crate::filters;
use crate::middleware::{AuthSession, RedirectIfAuthenticated};
use crate::models::flash::{self, Flash, Severity};
use crate::services::validation::{self, LOGIN_RULES, REGISTER_RULES, ValidationReport};
use crate::state::AppState;
use crate::store::types::{Credentials, NewUser};

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub flash: Option<Flash>,
    pub username: String,
    pub errors: ValidationReport,
}

/// Register page template. Passwords are never echoed back.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub flash: Option<Flash>,
    pub username: String,
    pub email: String,
    pub errors: ValidationReport,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(_guard: RedirectIfAuthenticated, auth: AuthSession) -> impl IntoResponse {
    LoginTemplate {
        flash: flash::take(auth.session()).await,
        ..Default::default()
    }
}

/// Handle login form submission.
///
/// On success the returned token is stored in the session; a user id left
/// over from registration stays in place and the session becomes fully
/// usable. Without one the session cannot own a cart list, so the user is
/// routed to signup instead of the cart page. On any failure the page
/// re-renders in place with a single error toast and no session change.
pub async fn login(
    State(state): State<AppState>,
    auth: AuthSession,
    Form(form): Form<LoginForm>,
) -> Response {
    let errors = validation::validate(
        &[
            ("username", form.username.as_str()),
            ("password", form.password.as_str()),
        ],
        LOGIN_RULES,
    );
    if !errors.is_valid() {
        return LoginTemplate {
            flash: None,
            username: form.username,
            errors,
        }
        .into_response();
    }

    let credentials = Credentials {
        username: form.username.clone(),
        password: form.password,
    };

    match state.store().login(&credentials).await {
        Ok(token) if !token.token.is_empty() => {
            if let Err(e) = auth.set_token(&token.token).await {
                tracing::error!("Failed to set session: {e}");
                return login_failed(form.username, "Login failed.".to_string());
            }

            // The login endpoint returns nothing but the token. Without a
            // user id from a prior registration there is no cart list to
            // show, so send the session to signup.
            if auth.user_id().await.is_some() {
                if let Err(e) =
                    flash::notify(auth.session(), "Login successful", Severity::Success).await
                {
                    tracing::error!("Failed to queue notification: {e}");
                }
                Redirect::to("/").into_response()
            } else {
                if let Err(e) = flash::notify(
                    auth.session(),
                    "Login successful. Create an account to manage carts.",
                    Severity::Info,
                )
                .await
                {
                    tracing::error!("Failed to queue notification: {e}");
                }
                Redirect::to("/register").into_response()
            }
        }
        Ok(_) => login_failed(form.username, "Login failed.".to_string()),
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            let message = e.response_body().map_or_else(
                || "Login failed.".to_string(),
                |body| format!("Login failed. {body}"),
            );
            login_failed(form.username, message)
        }
    }
}

fn login_failed(username: String, message: String) -> Response {
    LoginTemplate {
        flash: Some(Flash::new(message, Severity::Error)),
        username,
        errors: ValidationReport::default(),
    }
    .into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(_guard: RedirectIfAuthenticated, auth: AuthSession) -> impl IntoResponse {
    RegisterTemplate {
        flash: flash::take(auth.session()).await,
        ..Default::default()
    }
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    auth: AuthSession,
    Form(form): Form<RegisterForm>,
) -> Response {
    let mut errors = validation::validate(
        &[
            ("username", form.username.as_str()),
            ("email", form.email.as_str()),
            ("password", form.password.as_str()),
            ("confirm_password", form.confirm_password.as_str()),
        ],
        REGISTER_RULES,
    );

    // The pattern rule is unbounded; the Email type also enforces the RFC
    // 5321 length limit.
    let email = match Email::parse(&form.email) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add("email", "Please input a valid email.");
            None
        }
    };

    let (true, Some(email)) = (errors.is_valid(), email) else {
        return RegisterTemplate {
            flash: None,
            username: form.username,
            email: form.email,
            errors,
        }
        .into_response();
    };

    let user = NewUser {
        username: form.username.clone(),
        email,
        password: form.password,
    };

    match state.store().register(&user).await {
        Ok(created) if created.id.as_i32() != 0 => {
            // The users endpoint only returns an id; it stands in for the token.
            if let Err(e) = auth.set_session(&created.id.to_string(), created.id).await {
                tracing::error!("Failed to set session: {e}");
                return register_failed(form.username, form.email);
            }
            if let Err(e) =
                flash::notify(auth.session(), "Registration successful", Severity::Success).await
            {
                tracing::error!("Failed to queue notification: {e}");
            }
            Redirect::to("/").into_response()
        }
        Ok(_) => register_failed(form.username, form.email),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            register_failed(form.username, form.email)
        }
    }
}

fn register_failed(username: String, email: String) -> Response {
    RegisterTemplate {
        flash: Some(Flash::new("Registration failed.", Severity::Error)),
        username,
        email,
        errors: ValidationReport::default(),
    }
    .into_response()
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears both session cells; the token is never revoked upstream because
/// the store API has no revocation endpoint.
pub async fn logout(auth: AuthSession) -> Response {
    if let Err(e) = auth.clear().await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = flash::notify(auth.session(), "Logout successful", Severity::Success).await {
        tracing::error!("Failed to queue notification: {e}");
    }

    Redirect::to("/login").into_response()
}
