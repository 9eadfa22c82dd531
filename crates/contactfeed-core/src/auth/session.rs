use reqwest::{Client, Method, RequestBuilder};

use super::Credential;
use crate::error::AuthError;

pub const GDATA_VERSION: &str = "3.0";

/// Authenticated handle held for the whole run.
///
/// Owns the HTTP client (and its connection pool) together with the token;
/// every request to the feed goes through [`Session::request`].
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    credential: Credential,
}

impl Session {
    pub fn new(client: Client, credential: Credential) -> Self {
        Self { client, credential }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Current token. An expired token is fatal, never silently reused.
    pub fn access_token(&self) -> Result<&str, AuthError> {
        if self.credential.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(&self.credential.access_token)
    }

    /// Start an authenticated request against the feed.
    pub fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, AuthError> {
        let token = self.access_token()?;
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token)
            .header("GData-Version", GDATA_VERSION))
    }
}
