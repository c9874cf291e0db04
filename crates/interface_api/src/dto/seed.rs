//! Demo seeding DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_SEED_COUNT: u32 = 10;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SeedQuery {
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub count: Option<u32>,
    pub seed_token: Option<String>,
}

impl SeedQuery {
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_SEED_COUNT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
    pub seeded: usize,
}

impl SeedResponse {
    pub fn new(seeded: usize) -> Self {
        Self {
            message: format!("Seeded {} demo claims", seeded),
            seeded,
        }
    }
}
