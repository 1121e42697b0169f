//! Domain models and enums exchanged across the decision pipeline.

pub mod classification;
pub mod decision;
pub mod event;
pub mod incident;
pub mod plan;
pub mod risk;
