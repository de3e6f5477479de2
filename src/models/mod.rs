// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod exchanges;
pub mod restaurant;

pub use exchanges::*;
pub use restaurant::*;
