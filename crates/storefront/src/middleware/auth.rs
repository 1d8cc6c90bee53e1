//! Authentication middleware and extractors.
//!
//! The session carries exactly two auth cells, `token` and `userId`.
//! [`AuthSession`] is the one place that reads or writes them; route
//! handlers and extractors go through it rather than touching the session
//! keys directly.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use papaya_market_core::UserId;

use crate::models::{CurrentUser, session_keys};

/// Explicit accessor for the two session auth cells.
///
/// Contract: `token()`, `user_id()`, `set_session(token, user_id)`,
/// `clear()`. Clearing removes both cells; with a single-threaded session
/// per request, sequential removal is atomic from the caller's view.
#[derive(Clone)]
pub struct AuthSession {
    session: Session,
}

impl AuthSession {
    /// Wrap an extracted session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The stored access token, if any. No format or expiry checks.
    pub async fn token(&self) -> Option<String> {
        self.session
            .get::<String>(session_keys::TOKEN)
            .await
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    /// The stored user id, if any.
    pub async fn user_id(&self) -> Option<UserId> {
        self.session
            .get::<UserId>(session_keys::USER_ID)
            .await
            .ok()
            .flatten()
    }

    /// Store both auth cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn set_session(
        &self,
        token: &str,
        user_id: UserId,
    ) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::TOKEN, token).await?;
        self.session.insert(session_keys::USER_ID, user_id).await
    }

    /// Store the token cell alone.
    ///
    /// The login endpoint returns only a token; a user id already present
    /// from registration stays untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn set_token(&self, token: &str) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::TOKEN, token).await
    }

    /// Remove both auth cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.remove::<String>(session_keys::TOKEN).await?;
        self.session.remove::<UserId>(session_keys::USER_ID).await?;
        Ok(())
    }

    /// The authenticated identity, present only when both cells are set.
    ///
    /// A token without a user id is not a usable identity; every gate in
    /// the app treats such a session as logged out, so the two cells can
    /// never disagree about where a request may go.
    pub async fn current_user(&self) -> Option<CurrentUser> {
        let token = self.token().await?;
        let user_id = self.user_id().await?;
        Some(CurrentUser { user_id, token })
    }

    /// The underlying session, for flash notifications.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::MissingSessionLayer)?;

        Ok(Self::new(session))
    }
}

/// Error returned when authentication is required but absent.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// The session layer is not installed; a deployment error, not a user one.
    MissingSessionLayer,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::MissingSessionLayer => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Extractor that requires an authenticated user.
///
/// Redirects to the login page when either auth cell is missing. A token
/// without a user id also redirects: ordinary absence-of-session is a
/// navigation concern, never a fault.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.user_id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthSession::from_request_parts(parts, state).await?;

        let user = auth
            .current_user()
            .await
            .ok_or(AuthRejection::RedirectToLogin)?;

        Ok(Self(user))
    }
}

/// Extractor that sends already-authenticated visitors away from the
/// login/register pages.
///
/// Uses the same both-cells predicate as [`RequireAuth`]: a session
/// holding only a token may still visit these pages, so a login without a
/// registered account lands on signup rather than ping-ponging between
/// `/` and `/login`.
pub struct RedirectIfAuthenticated;

/// Rejection for [`RedirectIfAuthenticated`]: a redirect to the cart list.
pub struct AlreadyAuthenticated;

impl IntoResponse for AlreadyAuthenticated {
    fn into_response(self) -> Response {
        Redirect::to("/").into_response()
    }
}

impl<S> FromRequestParts<S> for RedirectIfAuthenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthSession::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if auth.current_user().await.is_some() {
            return Err(AlreadyAuthenticated.into_response());
        }

        Ok(Self)
    }
}
