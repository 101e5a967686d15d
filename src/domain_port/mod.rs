mod key_resolver;
mod session_store;

pub use key_resolver::*;
pub use session_store::*;
