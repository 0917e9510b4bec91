//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `DomainState`: per-domain pacing and robots.txt state
//! - `TaskOutcome`: the fate of each task pulled from the frontier

mod domain_state;
mod task_outcome;

// Re-export main types
pub use domain_state::DomainState;
pub use task_outcome::TaskOutcome;
