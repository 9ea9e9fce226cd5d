//! Progress tracking across checklist items

mod tracker;

pub use tracker::{Outcome, ProgressTracker};
