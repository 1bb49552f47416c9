//! CLI library for testing purposes

pub mod config;
pub mod generate;
pub mod path_glob;
pub mod view;

pub use config::Config;
pub use generate::{CheckStatus, Destination, GenerateOptions, check_jobs, plan_jobs};
