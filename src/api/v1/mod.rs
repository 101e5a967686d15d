mod auth;
mod error;
mod handler;
mod router;

pub use auth::*;
pub use error::{ApiError, ApiErrorCode, recover_error};
pub use handler::ApiResponse;
pub use router::{routes, with_auth};
