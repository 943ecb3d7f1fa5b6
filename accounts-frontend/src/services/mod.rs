pub mod accounts_client;
pub mod metrics;
