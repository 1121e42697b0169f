//! Decision logic services.

pub mod autonomy;
pub mod behavior;
pub mod breach;
pub mod classifier;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod learning;
pub mod normalize;
pub mod planner;
