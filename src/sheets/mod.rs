pub mod client;

pub use client::{SheetsClient, SheetsClientError, ValueRange};
