mod authenticator;
mod token_codec;

pub use authenticator::*;
pub use token_codec::*;
