use crate::ByteccError;
use crate::error::{IsRetryable, OauthError};
use crate::google::GoogleOauthEndpoints;
use crate::server::guards::session::CurrentSession;
use crate::server::router::ByteccState;
use crate::session::{Credential, PendingAuthorization, SessionContext};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use oauth2::{AuthorizationCode, PkceCodeChallenge, PkceCodeVerifier};
use serde_json::json;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tracing::{error, info, warn};

/// GET /google/auth
///
/// Starts the authorization-code + PKCE flow and redirects the browser to Google.
pub async fn google_oauth_entry(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, ByteccError> {
    let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
    let (auth_url, csrf_token) =
        GoogleOauthEndpoints::build_authorize_url(&state.google_cfg, challenge)?;

    state.pending.insert(
        csrf_token.secret().clone(),
        PendingAuthorization {
            session_id: session.id().into(),
            pkce_verifier: verifier.secret().as_str().into(),
        },
    );

    info!(auth_host = ?auth_url.host_str(), "Dispatching Google OAuth redirect");
    Ok(Redirect::temporary(auth_url.as_str()).into_response())
}

/// GET /oauth2callback
///
/// Only acts when the provider sent `code`, `state`, or `error`; anything else is a plain 404
/// and leaves the session untouched, so reloading a clean URL is harmless.
pub async fn google_oauth_callback(
    State(state): State<ByteccState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let param = |name: &str| {
        params
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let code = param("code");
    let state_param = param("state");
    let provider_error = param("error");

    if code.is_none() && state_param.is_none() && provider_error.is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let callback = CallbackParams {
        code,
        state: state_param,
        error: provider_error,
        error_description: param("error_description"),
    };

    match process_callback(&state, &session, callback).await {
        Ok(credential) => {
            session.install_credential(credential);
            info!("Google OAuth callback accepted");
            Redirect::to(&state.google_cfg.post_login_redirect).into_response()
        }
        Err(err) => {
            error!("Google OAuth failure: {:?}", err);
            err.into_response()
        }
    }
}

struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

async fn process_callback(
    state: &ByteccState,
    session: &SessionContext,
    params: CallbackParams,
) -> Result<Credential, ByteccError> {
    // Any state we were handed is spent, whatever happens next.
    let pending = params.state.as_deref().and_then(|s| state.pending.take(s));

    if let Some(reason) = params.error {
        let message = params.error_description.unwrap_or_else(|| reason.clone());
        warn!(reason = %reason, "Google authorization was not granted");
        return Err(
            OauthError::flow("OAUTH_DENIED", format!("Authorization denied: {message}")).into(),
        );
    }

    let pending = pending.ok_or_else(|| {
        OauthError::flow(
            "OAUTH_STATE_UNKNOWN",
            "Authorization state is unknown, expired, or already used",
        )
    })?;

    let same_session: bool = pending
        .session_id
        .as_bytes()
        .ct_eq(session.id().as_bytes())
        .into();
    if !same_session {
        return Err(OauthError::flow("CSRF_MISMATCH", "CSRF token mismatch").into());
    }

    let code = params
        .code
        .ok_or_else(|| OauthError::flow("OAUTH_CODE_MISSING", "Missing authorization code"))?;

    GoogleOauthEndpoints::exchange_authorization_code(
        &state.google_cfg,
        AuthorizationCode::new(code),
        PkceCodeVerifier::new(pending.pkce_verifier.to_string()),
        &state.google_client,
    )
    .await
    .map_err(|e| {
        OauthError::Flow {
            code: "TOKEN_EXCHANGE_FAILED".to_string(),
            message: format!("Token exchange failed: {e}"),
            details: Some(json!({ "retryable": e.is_retryable() })),
        }
        .into()
    })
}
