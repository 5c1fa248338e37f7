use crate::server::router::ByteccState;
use crate::session::SessionContext;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use std::sync::Arc;
use tracing::debug;

pub const SESSION_COOKIE: &str = "bytecc_session";

/// The browser session of the current request, installed by [`attach_session`].
#[derive(Clone)]
pub struct CurrentSession(pub Arc<SessionContext>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Resolve the session from the encrypted cookie, starting a new one when the cookie is
/// missing, undecryptable, or names an evicted session.
pub async fn attach_session(
    State(state): State<ByteccState>,
    jar: PrivateCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.get(cookie.value()));

    let (jar, session) = match existing {
        Some(session) => (jar, session),
        None => {
            let session = state.sessions.create();
            debug!("[Session] new browser session");
            let cookie = build_session_cookie(session.id().to_string(), !state.insecure_cookie);
            (jar.add(cookie), session)
        }
    };

    req.extensions_mut().insert(CurrentSession(session));
    let resp = next.run(req).await;
    (jar, resp).into_response()
}

fn build_session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}
