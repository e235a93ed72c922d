mod progress;
mod session;
mod ticker;
mod workflow;

// Public API of the attempt subsystem.
pub use crate::error::AttemptError;
pub use progress::AttemptProgress;
pub use session::{AttemptSession, SubmitMode, TickOutcome};
pub use ticker::AttemptTicker;
pub use workflow::{AttemptWorkflow, SubmitOutcome};
