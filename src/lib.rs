// Configuration & errors
pub mod config;
pub mod error;

// Dispatch pipeline and the messaging platform
pub mod telegram;
pub mod webhook;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod shutdown;
pub mod telemetry;
