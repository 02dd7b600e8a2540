mod cache;
mod session;

pub use cache::TokenCache;
pub use session::AuthSession;
pub use session::SessionState;
pub use session::SessionStatus;
pub use session::NOT_AUTHORIZED;
