use std::fmt;
use std::sync::Arc;

use gatehouse_core::auth::crypto::CryptoError;
use gatehouse_core::auth::token::TokenService;
use gatehouse_core::store::UserStore;
use gatehouse_core::users::service::UserService;

/// Shared, read-only application state. Cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
    pub tokens: Arc<TokenService>,
    /// When set, `EmailNotFound` and `InvalidCredentials` render as the
    /// same generic unauthorized response so login attempts cannot probe
    /// which addresses are registered.
    pub mask_credential_errors: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        tokens: TokenService,
        mask_credential_errors: bool,
    ) -> Result<Self, CryptoError> {
        Ok(Self {
            service: Arc::new(UserService::new(store)?),
            tokens: Arc::new(tokens),
            mask_credential_errors,
        })
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
