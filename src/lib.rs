pub mod config;
pub mod db;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod reports;
pub mod views;
