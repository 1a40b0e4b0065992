//! Remote device transport
//!
//! The driver needs four capabilities from the device side: a writable
//! root directory for transient files, file push, shell execution with a
//! checked exit status, and file removal. [`DeviceTarget`] captures that
//! surface; [`adb::AdbTarget`] is the production transport.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub mod adb;

pub use adb::AdbTarget;

/// Result type for device operations
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Device transport error types
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Spawning or talking to the transport process failed
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport command itself exited non-zero
    #[error("{command} failed ({status}): {stderr}")]
    CommandFailed {
        /// The local command line that failed
        command: String,
        /// Its exit status
        status: String,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// The command reached the device but reported a non-zero exit status
    #[error("remote command {command:?} exited with status {status}")]
    RemoteCommandFailed {
        /// The remote command line
        command: String,
        /// The remote exit status
        status: i32,
        /// Output produced before the status line
        output: String,
    },

    /// The device output did not end in a parsable exit status
    #[error("could not read remote exit status for {command:?}, got {tail:?}")]
    MalformedExitStatus {
        /// The remote command line
        command: String,
        /// The line where a status was expected
        tail: String,
    },
}

/// Capability surface the driver consumes from a connected device.
#[async_trait]
pub trait DeviceTarget: Send + Sync {
    /// Writable directory on the device for transient files.
    fn device_root(&self) -> &str;

    /// Copy a local file to `remote_path` on the device.
    async fn push_file(&self, local_path: &Path, remote_path: &str) -> Result<()>;

    /// Run a command on the device, failing on non-zero exit status.
    /// Returns the command's output.
    async fn shell_check_output(&self, argv: &[&str]) -> Result<String>;

    /// Delete a file on the device.
    async fn remove_file(&self, remote_path: &str) -> Result<()>;
}
