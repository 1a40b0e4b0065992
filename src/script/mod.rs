//! Script execution
//!
//! Turns a batch of event lines into a transient script on the device,
//! replays it through the injector, and removes it again. The remote copy
//! is removed even when the injector run fails; the local copy lives and
//! dies with the call.

use std::io::Write;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::device::{DeviceError, DeviceTarget};
use crate::gesture::EventLine;

/// Result type for script execution
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Script execution error types
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Writing the local script artifact failed
    #[error("failed to write local script: {0}")]
    Io(#[from] std::io::Error),

    /// Pushing the script to the device failed
    #[error("failed to push script to device: {0}")]
    Transfer(#[source] DeviceError),

    /// The injector run failed or exited non-zero
    #[error("injector run failed: {0}")]
    Execution(#[source] DeviceError),

    /// The transient remote script could not be removed
    #[error("failed to remove remote script {path}: {source}")]
    Cleanup {
        /// The stale remote path left on the device
        path: String,
        /// The underlying transport failure
        source: DeviceError,
    },
}

/// Pushes and replays event scripts on one device.
pub struct ScriptExecutor {
    target: Box<dyn DeviceTarget>,
    injector_path: String,
    input_device: String,
}

impl ScriptExecutor {
    /// Create an executor for the given device, injector path, and input
    /// device node.
    pub fn new(
        target: Box<dyn DeviceTarget>,
        injector_path: impl Into<String>,
        input_device: impl Into<String>,
    ) -> Self {
        Self {
            target,
            injector_path: injector_path.into(),
            input_device: input_device.into(),
        }
    }

    /// Run a batch of event lines on the device.
    ///
    /// An empty batch is a no-op: no transfer, no remote invocation, no
    /// cleanup.
    pub async fn execute(&self, lines: &[EventLine]) -> Result<()> {
        if lines.is_empty() {
            debug!("no event lines to execute");
            return Ok(());
        }

        // Local artifact with a unique name; released when this call
        // returns, on every path.
        let mut script = NamedTempFile::new()?;
        for line in lines {
            writeln!(script, "{line}")?;
        }
        script.flush()?;

        let file_name = script
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gesture-script".to_string());
        let remote_path = join_remote(self.target.device_root(), &file_name);

        debug!(lines = lines.len(), remote = %remote_path, "executing gesture script");

        self.target
            .push_file(script.path(), &remote_path)
            .await
            .map_err(ScriptError::Transfer)?;

        let run_result = self
            .target
            .shell_check_output(&[&self.injector_path, &self.input_device, &remote_path])
            .await
            .map(|_| ())
            .map_err(ScriptError::Execution);

        // The remote copy is removed whether or not the run succeeded. A
        // failed removal leaves a stale script behind; log the path so it
        // can be cleaned up by hand, and never let it mask a run error.
        if let Err(source) = self.target.remove_file(&remote_path).await {
            warn!(path = %remote_path, error = %source, "failed to remove remote gesture script");
            if run_result.is_ok() {
                return Err(ScriptError::Cleanup {
                    path: remote_path,
                    source,
                });
            }
        }

        run_result
    }
}

fn join_remote(root: &str, name: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::events;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts transport calls and optionally fails the injector run or
    /// the removal.
    #[derive(Default)]
    struct CountingDevice {
        pushes: AtomicUsize,
        shells: AtomicUsize,
        removals: AtomicUsize,
        fail_shell: bool,
        fail_remove: bool,
    }

    #[async_trait]
    impl DeviceTarget for Arc<CountingDevice> {
        fn device_root(&self) -> &str {
            "/remote/tmp/"
        }

        async fn push_file(
            &self,
            local_path: &Path,
            _remote_path: &str,
        ) -> crate::device::Result<()> {
            assert!(local_path.exists());
            self.pushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn shell_check_output(&self, argv: &[&str]) -> crate::device::Result<String> {
            self.shells.fetch_add(1, Ordering::SeqCst);
            if self.fail_shell {
                return Err(DeviceError::RemoteCommandFailed {
                    command: argv.join(" "),
                    status: 1,
                    output: String::new(),
                });
            }
            Ok(String::new())
        }

        async fn remove_file(&self, remote_path: &str) -> crate::device::Result<()> {
            self.removals.fetch_add(1, Ordering::SeqCst);
            if self.fail_remove {
                return Err(DeviceError::RemoteCommandFailed {
                    command: format!("rm -f {remote_path}"),
                    status: 1,
                    output: String::new(),
                });
            }
            Ok(())
        }
    }

    fn executor(device: Arc<CountingDevice>) -> ScriptExecutor {
        ScriptExecutor::new(Box::new(device), "/data/local/orng", "/dev/input/event2")
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let device = Arc::new(CountingDevice::default());
        executor(device.clone()).execute(&[]).await.unwrap();

        assert_eq!(device.pushes.load(Ordering::SeqCst), 0);
        assert_eq!(device.shells.load(Ordering::SeqCst), 0);
        assert_eq!(device.removals.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_run_cleans_up_once() {
        let device = Arc::new(CountingDevice::default());
        executor(device.clone())
            .execute(&[events::tap(1, 2, 1)])
            .await
            .unwrap();

        assert_eq!(device.pushes.load(Ordering::SeqCst), 1);
        assert_eq!(device.shells.load(Ordering::SeqCst), 1);
        assert_eq!(device.removals.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_run_still_cleans_up_once() {
        let device = Arc::new(CountingDevice {
            fail_shell: true,
            ..Default::default()
        });
        let err = executor(device.clone())
            .execute(&[events::tap(1, 2, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::Execution(_)));
        assert_eq!(device.removals.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_mask_run_error() {
        let device = Arc::new(CountingDevice {
            fail_shell: true,
            fail_remove: true,
            ..Default::default()
        });
        let err = executor(device.clone())
            .execute(&[events::tap(1, 2, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::Execution(_)));
    }

    #[tokio::test]
    async fn test_cleanup_failure_after_success_is_reported() {
        let device = Arc::new(CountingDevice {
            fail_remove: true,
            ..Default::default()
        });
        let err = executor(device.clone())
            .execute(&[events::tap(1, 2, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::Cleanup { .. }));
    }

    #[test]
    fn test_join_remote_normalizes_root() {
        assert_eq!(join_remote("/remote/tmp/", "s.txt"), "/remote/tmp/s.txt");
        assert_eq!(join_remote("/remote/tmp", "s.txt"), "/remote/tmp/s.txt");
    }
}
