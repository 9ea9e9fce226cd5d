//! Bounded loop contract
//!
//! Repeats an ordered stage sequence against a shared keyed state store
//! until a stage invokes the exit action or the iteration cap is reached.
//! The loop is never unbounded: the cap is a hard stop. Only the designated
//! exit stage holds an armed exit handle; any other stage's exit request is
//! rejected.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use eyre::Result;
use tracing::{debug, info, warn};

/// Shared keyed state the stages read and write
#[derive(Debug, Default)]
pub struct StageState {
    values: HashMap<String, String>,
}

impl StageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state pre-populated with one key
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.set(key, value);
        state
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Handle through which a stage may request loop termination
///
/// Handles are created per stage run. Only the handle given to the
/// designated exit stage is armed; requests through a disarmed handle are
/// logged and ignored.
#[derive(Clone)]
pub struct ExitHandle {
    flag: Arc<AtomicBool>,
    armed: bool,
    stage: String,
}

impl ExitHandle {
    fn new(flag: Arc<AtomicBool>, armed: bool, stage: &str) -> Self {
        Self {
            flag,
            armed,
            stage: stage.to_string(),
        }
    }

    /// Request loop termination; returns whether the request was accepted
    pub fn request_exit(&self) -> bool {
        if self.armed {
            debug!(stage = %self.stage, "ExitHandle::request_exit: accepted");
            self.flag.store(true, Ordering::SeqCst);
            true
        } else {
            warn!(stage = %self.stage, "ExitHandle::request_exit: rejected, stage is not the exit stage");
            false
        }
    }

    /// Whether termination has been requested
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A single stage of a bounded loop
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name, used for the exit-stage designation and diagnostics
    fn name(&self) -> &str;

    /// Run the stage once against the shared state
    async fn run(&self, state: &mut StageState, exit: &ExitHandle) -> Result<()>;
}

/// How a bounded loop run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The exit stage requested termination
    Exited { passes: u32 },
    /// The iteration cap was reached without an exit request
    CapReached { passes: u32 },
}

/// Repeat a stage sequence up to `max_passes` times
pub struct BoundedLoop {
    stages: Vec<Box<dyn Stage>>,
    max_passes: u32,
    exit_stage: String,
}

impl BoundedLoop {
    /// Create a loop; `exit_stage` names the only stage allowed to exit it
    pub fn new(stages: Vec<Box<dyn Stage>>, max_passes: u32, exit_stage: impl Into<String>) -> Self {
        Self {
            stages,
            max_passes,
            exit_stage: exit_stage.into(),
        }
    }

    /// Run the loop to its exit signal or its cap
    ///
    /// The exit request takes effect as soon as the requesting stage
    /// returns: remaining stages of the pass are skipped.
    pub async fn run(&self, state: &mut StageState) -> Result<LoopOutcome> {
        debug!(max_passes = self.max_passes, exit_stage = %self.exit_stage, "BoundedLoop::run: called");
        let flag = Arc::new(AtomicBool::new(false));

        for pass in 1..=self.max_passes {
            debug!(pass, "BoundedLoop::run: pass start");
            for stage in &self.stages {
                let armed = stage.name() == self.exit_stage;
                let handle = ExitHandle::new(flag.clone(), armed, stage.name());

                stage.run(state, &handle).await?;

                if flag.load(Ordering::SeqCst) {
                    info!(pass, stage = stage.name(), "Bounded loop exited");
                    return Ok(LoopOutcome::Exited { passes: pass });
                }
            }
        }

        info!(max_passes = self.max_passes, "Bounded loop reached its cap");
        Ok(LoopOutcome::CapReached {
            passes: self.max_passes,
        })
    }
}
