pub mod access;
pub mod app;
pub mod metrics;
pub mod session;
pub mod units;
