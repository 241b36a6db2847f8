//! Outbound adapters implementing the domain's driven ports.
//!
//! - `persistence`: PostgreSQL repositories (Diesel, `diesel-async`, `bb8`).
//! - `weather`: OpenWeatherMap HTTP source (reqwest).
//! - `rate_limit`: Redis counter store (`bb8-redis`).

pub mod persistence;
pub mod rate_limit;
pub mod weather;
