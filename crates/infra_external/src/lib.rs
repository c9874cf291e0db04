//! External Service Adapters
//!
//! Adapters in this crate talk to systems outside the deployment over HTTP.
//! Each one implements a port defined in `domain_scoring` and maps transport
//! failures to `PortError`.

pub mod ollama;

pub use ollama::{OllamaClient, OllamaConfig};
