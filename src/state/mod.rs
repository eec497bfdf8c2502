//! State module for tracking fetch progress
//!
//! # Components
//!
//! - `FetchState`: Tracks one logical fetch through its attempts (pending,
//!   attempting, succeeded, failed) and rejects illegal transitions

mod fetch_state;

// Re-export main types
pub use fetch_state::FetchState;
