pub mod check;
pub mod config;
pub mod fetch;
pub mod infra;
pub mod input;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod results;
pub mod services;
