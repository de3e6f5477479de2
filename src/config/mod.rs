// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod cache;
pub mod db;
pub mod env;

pub use cache::init_cache;
pub use db::init_db_pool;
pub use env::{log_filter, Config};
