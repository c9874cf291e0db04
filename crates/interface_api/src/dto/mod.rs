//! Request and response bodies

pub mod claims;
pub mod decisions;
pub mod models;
pub mod seed;
