use crate::config::GoogleResolvedConfig;
use crate::error::{ByteccError, OauthError};
use crate::session::Credential;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use tracing::info;

type GoogleOauthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Stateless Google OAuth endpoints (authorization code + PKCE) built from resolved config.
pub struct GoogleOauthEndpoints;

impl GoogleOauthEndpoints {
    fn build_client(cfg: &GoogleResolvedConfig) -> Result<GoogleOauthClient, ByteccError> {
        let mut client = BasicClient::new(ClientId::new(cfg.client_id.clone()));
        if !cfg.client_secret.is_empty() {
            client = client.set_client_secret(ClientSecret::new(cfg.client_secret.clone()));
        }

        Ok(client
            .set_auth_uri(AuthUrl::new(cfg.auth_url.to_string())?)
            .set_token_uri(TokenUrl::new(cfg.token_url.to_string())?)
            .set_redirect_uri(RedirectUrl::new(cfg.redirect_url.to_string())?))
    }

    /// Authorization URL with the configured scopes (space-joined, in order), a fresh random
    /// `state`, and the PKCE challenge.
    pub fn build_authorize_url(
        cfg: &GoogleResolvedConfig,
        pkce_challenge: PkceCodeChallenge,
    ) -> Result<(url::Url, CsrfToken), ByteccError> {
        let client = Self::build_client(cfg)?;
        let req = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(cfg.scopes.iter().cloned().map(Scope::new))
            .set_pkce_challenge(pkce_challenge)
            .add_extra_param("access_type", cfg.access_type.clone())
            .add_extra_param("prompt", "consent");

        Ok(req.url())
    }

    /// Exchange an authorization code (PKCE) for a session credential.
    pub(crate) async fn exchange_authorization_code(
        cfg: &GoogleResolvedConfig,
        code: AuthorizationCode,
        verifier: PkceCodeVerifier,
        http_client: &reqwest::Client,
    ) -> Result<Credential, OauthError> {
        let client = Self::build_client(cfg).map_err(|e| OauthError::Other {
            message: format!("failed to build oauth2 client: {e}"),
        })?;

        let token: BasicTokenResponse = client
            .exchange_code(code)
            .set_pkce_verifier(verifier)
            .request_async(http_client)
            .await?;

        info!(
            expires_in = ?token.expires_in(),
            "Google OAuth2 code exchange completed successfully"
        );
        Ok(credential_from_token(&token, &cfg.scopes))
    }
}

/// Google echoes the granted scopes; fall back to the requested ones when it does not.
fn credential_from_token(token: &BasicTokenResponse, requested: &[String]) -> Credential {
    let scopes = token.scopes().map_or_else(
        || requested.to_vec(),
        |granted| granted.iter().map(|s| s.to_string()).collect(),
    );
    Credential::new(
        token.access_token().secret().as_str(),
        scopes,
        token.expires_in(),
    )
}
