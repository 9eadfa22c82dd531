//! OAuth2 service-account authentication.
//!
//! 1. Loads the service-account key (JSON key file or bare PEM)
//! 2. Signs a JWT bearer assertion for the impersonated user and scope
//! 3. Exchanges it once at the token endpoint for an access token
//! 4. Wraps the token in a [`Session`] used for every later request
//!
//! A failed exchange is fatal. There is no refresh: the tool runs one
//! short-lived command per token.

mod credential;
mod session;

pub use credential::{authenticate, exchange_assertion, sign_assertion, Credential, ServiceAccountKey};
pub use session::Session;

pub const DEFAULT_SCOPE: &str = "https://www.google.com/m8/feeds/";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Everything needed to request a token for one run.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub application_name: String,
    /// Overrides the key file's `client_email` when set.
    pub service_account_id: Option<String>,
    pub impersonated_user: Option<String>,
    pub scope: String,
    /// Overrides the key file's `token_uri` when set.
    pub token_uri: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            application_name: "contactfeed".to_string(),
            service_account_id: None,
            impersonated_user: None,
            scope: DEFAULT_SCOPE.to_string(),
            token_uri: None,
        }
    }
}
