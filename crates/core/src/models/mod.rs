pub mod account;
pub mod analytics;
pub mod asset;
pub mod credential;
pub mod number;
pub mod performance;
pub mod pool;
pub mod portfolio;
pub mod position;
pub mod snapshot;
