pub mod categorize;
pub mod ops;
pub mod sync;
pub mod transactions;
