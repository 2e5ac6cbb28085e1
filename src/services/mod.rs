pub mod auth;
pub mod children;
pub mod events;
pub mod metrics;
pub mod pdf;
pub mod reports;
