mod algorithm;
mod claims;
mod principal;
mod session;

pub use algorithm::*;
pub use claims::*;
pub use principal::*;
pub use session::*;
