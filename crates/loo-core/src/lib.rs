//! Lucky Loo core.
//!
//! The client-side domain of the High-Stakes Restroom Finder: the jury
//! bench, verdict value objects, and the stage state machine that walks a
//! visit from welcome through capture, plea, deliberation, and verdict.
//!
//! Network and capture implementations live in `loo-interaction`; frontends
//! render the [`session::StageView`] models produced here.

pub mod error;
pub mod jury;
pub mod session;
pub mod verdict;

// Re-export common error type
pub use error::{LooError, Result};
