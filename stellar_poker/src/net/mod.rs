//! Coordinator networking: request/response bodies and the HTTP client.

pub mod client;
pub mod errors;
pub mod messages;

pub use client::{Coordinator, CoordinatorClient};
pub use errors::{NetError, NetResult};
