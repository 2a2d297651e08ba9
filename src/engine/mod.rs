pub mod models;
pub mod error;
pub mod config;
pub mod progress;
pub mod simulator;
pub mod arena;
pub mod bot_strategy;
pub mod evaluator;
