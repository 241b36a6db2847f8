//! Request middleware.
//!
//! `Trace` assigns the per-request trace identifier; `RateLimit` enforces the
//! per-client request cap before any route runs.

pub mod rate_limit;
pub mod trace;

pub use rate_limit::RateLimit;
pub use trace::Trace;
