//! Authentication module for mydrive.
//!
//! Session state, durable token storage, token-derived identity, form
//! validation and the login/logout flows.

pub mod identity;
pub mod service;
pub mod session;
pub mod token_store;
pub mod validation;

pub use identity::{user_from_token, User, FALLBACK_EMAIL};
pub use service::AuthService;
pub use session::{AuthState, Session, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use validation::Credentials;
