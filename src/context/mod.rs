//! Per-request execution context: cancellation, deadline and the principal
//! once authentication has succeeded.

mod request_context;
pub use request_context::*;
