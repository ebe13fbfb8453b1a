//! Concrete data structures behind the core traits.

pub mod params;

// Re-export key types from params
pub use params::TaskParams;
