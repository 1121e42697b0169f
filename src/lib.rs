pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod rng;
pub mod services;

pub use config::EngineConfig;
pub use services::engine::{DecisionEngine, EngineStats};
