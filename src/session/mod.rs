//! Session control
//!
//! One [`SessionController`] per driver process: immutable configuration
//! plus the script executor. Every `execute` call is a self-contained
//! translate, transfer, run, cleanup transaction with no carryover
//! between calls.

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::device::DeviceTarget;
use crate::gesture::{GestureCommand, GestureError};
use crate::script::{ScriptError, ScriptExecutor};

/// Errors surfaced by [`SessionController::execute`]
#[derive(Error, Debug)]
pub enum SessionError {
    /// Command could not be parsed into a gesture
    #[error(transparent)]
    Gesture(#[from] GestureError),

    /// Script transfer, run, or cleanup failed
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Owns the configuration and the device handle; entry point for one
/// command line at a time.
pub struct SessionController {
    config: Config,
    executor: ScriptExecutor,
}

impl SessionController {
    /// Create a controller for the given configuration and device.
    pub fn new(config: Config, target: Box<dyn DeviceTarget>) -> Self {
        let executor = ScriptExecutor::new(
            target,
            config.injector_path.clone(),
            config.input_device.clone(),
        );
        Self { config, executor }
    }

    /// Translate one command line and run it on the device.
    pub async fn execute(&self, command: &str, args: &[&str]) -> Result<(), SessionError> {
        let gesture = GestureCommand::parse(command, args)?;
        let lines = gesture.expand(&self.config.dimensions, &self.config.swipe_padding);
        debug!(command, lines = lines.len(), "translated gesture");

        if lines.is_empty() {
            return Ok(());
        }
        self.executor.execute(&lines).await?;
        Ok(())
    }
}
