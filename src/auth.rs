//! Credential identifiers, scope sets, cached bearer tokens, and the authenticator that owns them.

pub mod authenticator;
pub mod credentials;
pub mod id;
pub mod scope;
pub mod secret;
pub mod token;

pub use authenticator::*;
pub use credentials::*;
pub use id::*;
pub use scope::*;
pub use secret::*;
pub use token::*;
