mod authenticator_fake;
mod jwt_codec;
mod key_resolvers;
mod session_authenticator;
mod session_issuer;

pub use authenticator_fake::*;
pub use jwt_codec::*;
pub use key_resolvers::*;
pub use session_authenticator::*;
pub use session_issuer::*;
