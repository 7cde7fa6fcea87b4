//! Domain layer: pure models, errors, and the ports the engine consumes.

pub mod errors;
pub mod models;
pub mod ports;
