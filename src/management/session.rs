use chrono::Utc;

use crate::{
    Res, error::Error, management::TokenCache, spotify::TokenProvider, types::Credential, utils,
    warning,
};

/// Reason carried by [`Error::ReauthorizationRequired`] when the user simply
/// has not authorized yet, as opposed to a failed exchange or refresh.
pub const NOT_AUTHORIZED: &str = "not authorized yet";

/// Where the session is in the authorization code flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    CodeReceived,
    Authenticated,
    Expired,
}

/// Per-process authorization state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Code captured from a redirect and not yet exchanged.
    pub pending_code: Option<String>,
    /// Last code handed to the token endpoint. A redirect replaying it is
    /// ignored.
    pub consumed_code: Option<String>,
    pub credential: Option<Credential>,
}

/// Keeps a valid Spotify access token available.
///
/// The session owns the token cache. Every operation that needs the Web API
/// goes through [`AuthSession::access_token`], which loads the cache, exchanges
/// a pending code or refreshes an expired credential as needed. When none of
/// that yields a token the caller gets [`Error::ReauthorizationRequired`] with a
/// fresh authorization URL.
pub struct AuthSession<P> {
    provider: P,
    cache: TokenCache,
    oauth_state: String,
    state: SessionState,
}

impl<P: TokenProvider> AuthSession<P> {
    pub fn new(provider: P, cache: TokenCache) -> Self {
        Self {
            provider,
            cache,
            oauth_state: utils::generate_state(),
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        match (&self.state.credential, &self.state.pending_code) {
            (Some(c), _) if c.is_expired() => SessionStatus::Expired,
            (Some(_), _) => SessionStatus::Authenticated,
            (None, Some(_)) => SessionStatus::CodeReceived,
            (None, None) => SessionStatus::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// The `state` value every authorization URL of this session carries.
    pub fn oauth_state(&self) -> &str {
        &self.oauth_state
    }

    pub fn authorize_url(&self) -> String {
        self.provider.authorize_url(&self.oauth_state)
    }

    /// Captures an authorization code from a redirect.
    ///
    /// # Arguments
    ///
    /// * `code` - The `code` query parameter of the redirect
    /// * `state` - The `state` query parameter, when the redirect carried one
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the code is now pending exchange. `Ok(false)` when the
    /// code is already pending, was already exchanged, or arrived while the
    /// session holds a usable credential. Reloading the redirect page or
    /// opening it in a second tab therefore never leaves a code behind that
    /// would later be exchanged in place of a refresh.
    ///
    /// # Errors
    ///
    /// [`Error::Authorization`] when `state` does not belong to this session
    /// or the code is blank.
    pub fn receive_code(&mut self, code: &str, state: Option<&str>) -> Res<bool> {
        if let Some(state) = state {
            if state != self.oauth_state {
                return Err(Error::Authorization(
                    "redirect state does not match this session".to_string(),
                ));
            }
        }

        let code = code.trim();
        if code.is_empty() {
            return Err(Error::Authorization("redirect carried an empty code".to_string()));
        }

        let seen = self.state.pending_code.as_deref() == Some(code)
            || self.state.consumed_code.as_deref() == Some(code);
        if seen {
            return Ok(false);
        }

        if self.has_usable_credential() {
            self.state.consumed_code = Some(code.to_string());
            return Ok(false);
        }

        self.state.pending_code = Some(code.to_string());
        Ok(true)
    }

    /// Returns an access token, authenticating first when needed.
    ///
    /// # Behavior
    ///
    /// 1. Loads the token cache when no credential is held in memory
    /// 2. Returns a usable credential as is, without any network call
    /// 3. Otherwise exchanges a pending code, if there is one
    /// 4. Otherwise refreshes the expired credential, exactly once
    ///
    /// A code still pending next to a usable credential (the credential came
    /// from the cache after the code arrived) is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::ReauthorizationRequired`] carrying a fresh authorization URL
    /// when there is no credential, the exchange fails or the refresh fails.
    pub async fn access_token(&mut self) -> Res<String> {
        if self.state.credential.is_none() {
            self.state.credential = self.load_cached().await;
        }

        let usable = self.has_usable_credential();

        if usable {
            if let Some(code) = self.state.pending_code.take() {
                self.state.consumed_code = Some(code);
            }
        } else if let Some(code) = self.state.pending_code.take() {
            self.state.consumed_code = Some(code.clone());
            let credential = match self.provider.exchange_code(&code).await {
                Ok(credential) => credential,
                Err(e) => {
                    return Err(self.reauthorization(&format!("code exchange failed: {e}")));
                }
            };
            self.persist(&credential).await;
            let token = credential.access_token.clone();
            self.state.credential = Some(credential);
            return Ok(token);
        }

        let Some(credential) = self.state.credential.clone() else {
            return Err(self.reauthorization(NOT_AUTHORIZED));
        };

        if usable {
            return Ok(credential.access_token);
        }

        match self.provider.refresh(&credential.refresh_token).await {
            Ok(refreshed) => {
                self.persist(&refreshed).await;
                let token = refreshed.access_token.clone();
                self.state.credential = Some(refreshed);
                Ok(token)
            }
            Err(e) => {
                self.state.credential = None;
                Err(self.reauthorization(&format!("token refresh failed: {e}")))
            }
        }
    }

    /// Drops the credential after the Web API rejected it and returns the
    /// reauthorization error to show instead.
    ///
    /// The cache is cleared too, otherwise the next call would load the
    /// rejected credential again.
    pub async fn invalidate(&mut self, reason: &str) -> Error {
        self.state.credential = None;
        if let Err(e) = self.cache.clear().await {
            warning!(
                "Failed to clear token cache {}: {}",
                self.cache.path().display(),
                e
            );
        }
        self.reauthorization(reason)
    }

    fn has_usable_credential(&self) -> bool {
        self.state
            .credential
            .as_ref()
            .is_some_and(|c| !c.is_expired_at(Utc::now()))
    }

    fn reauthorization(&self, reason: &str) -> Error {
        Error::ReauthorizationRequired {
            reason: reason.to_string(),
            authorize_url: self.authorize_url(),
        }
    }

    async fn load_cached(&self) -> Option<Credential> {
        match self.cache.load().await {
            Ok(credential) => credential,
            Err(e) => {
                warning!(
                    "Ignoring unreadable token cache {}: {}",
                    self.cache.path().display(),
                    e
                );
                None
            }
        }
    }

    /// A credential that cannot be cached is still usable for this process.
    async fn persist(&self, credential: &Credential) {
        if let Err(e) = self.cache.store(credential).await {
            warning!(
                "Failed to save token to {}: {}",
                self.cache.path().display(),
                e
            );
        }
    }
}
