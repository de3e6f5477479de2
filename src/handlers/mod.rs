// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod health;
pub mod restaurants;

pub use admin::config as admin_config;
pub use health::config as health_config;
pub use restaurants::config as restaurants_config;
