//! API layer - service endpoints outside the webhook routes.

mod health;

pub use health::{health, HealthResponse};
