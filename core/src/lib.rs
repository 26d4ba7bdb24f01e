pub mod cache;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod explainer;
pub mod inventory;
pub mod lexical;
pub mod market;
pub mod name_generator;
pub mod period;
pub mod portfolio;
pub mod rng;
pub mod scorer;
pub mod snapshot;
pub mod types;
