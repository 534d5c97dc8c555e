//! Magic link sign-in and sign-out

use common::{ApiClient, SessionManager};
use tracing::{error, info};

use crate::{
    error::{AuthError, AuthResult},
    models::{AuthUser, MagicLinkRequest, MagicLinkResponse, VerifyRequest, VerifyResponse},
    validation::{validate_email, validate_verification_token},
};

/// Drives the passwordless sign-in flow against the backend
#[derive(Clone)]
pub struct MagicLinkService {
    client: ApiClient,
}

impl MagicLinkService {
    /// Create a new magic link service
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn session(&self) -> &SessionManager {
        self.client.session()
    }

    /// Ask the backend to email a sign-in link
    pub async fn request_magic_link(&self, email: &str) -> AuthResult<MagicLinkResponse> {
        let email = email.trim();
        validate_email(email).map_err(AuthError::InvalidEmail)?;

        info!("Requesting magic link");

        let response: MagicLinkResponse = self
            .client
            .post_json(
                "/auth/magic-link",
                &MagicLinkRequest {
                    email: email.to_string(),
                },
            )
            .await
            .map_err(|e| {
                error!("Magic link request failed: {}", e);
                e
            })?;

        if response.dev_login_url.is_some() {
            info!("Backend returned a development login link");
        }

        Ok(response)
    }

    /// Exchange a magic link token for a session and persist it
    pub async fn verify_magic_link(&self, token: &str) -> AuthResult<AuthUser> {
        let token = token.trim();
        validate_verification_token(token).map_err(AuthError::InvalidToken)?;

        info!("Verifying magic link");

        let response: VerifyResponse = self
            .client
            .post_json(
                "/auth/verify",
                &VerifyRequest {
                    token: token.to_string(),
                },
            )
            .await?;

        self.session()
            .create_session(&response.access_token, &response.user.id)?;

        info!("Signed in as user: {}", response.user.id);
        Ok(response.user)
    }

    /// Forget the local credentials
    pub fn sign_out(&self) -> AuthResult<()> {
        info!("Signing out");
        self.session().delete_session()?;
        Ok(())
    }

    /// Whether both the token and the user id are stored
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Id of the signed-in user, if any
    pub fn current_user_id(&self) -> AuthResult<Option<String>> {
        Ok(self.session().user_id()?)
    }
}
