pub mod client;
pub mod types;

pub use client::{ZeroShotClient, ZeroShotError};
pub use types::{ZeroShotRequest, ZeroShotResponse};
