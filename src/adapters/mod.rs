//! Adapters: concrete implementations of the engine's ports.

pub mod strategies;
