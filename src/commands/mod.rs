pub mod fetch;
pub mod pick;

// Re-export command functions for convenience
pub use fetch::{fetch, FetchParams};
pub use pick::{pick, PickParams};
