//! Request handlers

pub mod claims;
pub mod decisions;
pub mod health;
pub mod models;
pub mod seed;
