#![forbid(unsafe_code)]

pub mod attempts;
pub mod error;

pub use edunex_core::Clock;

pub use attempts::{
    AttemptProgress, AttemptSession, AttemptTicker, AttemptWorkflow, SubmitMode, SubmitOutcome,
    TickOutcome,
};
pub use error::AttemptError;
