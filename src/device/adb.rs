//! ADB transport
//!
//! Drives the `adb` command-line tool as a subprocess. `adb shell` does
//! not propagate the remote exit status, so checked execution appends
//! `; echo $?` to the remote command and parses the trailing line of the
//! output as the status.

use std::path::Path;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{DeviceError, DeviceTarget, Result};

/// Default writable directory on the device for transient files
pub const DEFAULT_DEVICE_ROOT: &str = "/data/local/tmp";

/// Device transport over the `adb` command-line tool.
#[derive(Debug, Clone)]
pub struct AdbTarget {
    adb_path: String,
    serial: Option<String>,
    device_root: String,
}

impl AdbTarget {
    /// Create a transport for the given adb binary, optional device
    /// serial, and device root directory.
    pub fn new(
        adb_path: impl Into<String>,
        serial: Option<String>,
        device_root: impl Into<String>,
    ) -> Self {
        Self {
            adb_path: adb_path.into(),
            serial,
            device_root: device_root.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.adb_path);
        if let Some(serial) = &self.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(adb = %self.adb_path, ?args, "running adb");
        let output = self.command().args(args).output().await?;

        if !output.status.success() {
            return Err(DeviceError::CommandFailed {
                command: format!("{} {}", self.adb_path, args.join(" ")),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl DeviceTarget for AdbTarget {
    fn device_root(&self) -> &str {
        &self.device_root
    }

    async fn push_file(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let local = local_path.to_string_lossy();
        self.run(&["push", local.as_ref(), remote_path]).await?;
        Ok(())
    }

    async fn shell_check_output(&self, argv: &[&str]) -> Result<String> {
        // adb flattens the argv into one remote shell line; the appended
        // echo carries the remote exit status back over the transport.
        let remote_command = format!("{}; echo $?", argv.join(" "));
        let output = self.run(&["shell", &remote_command]).await?;
        let text = String::from_utf8_lossy(&output.stdout).replace("\r\n", "\n");
        parse_checked_output(&argv.join(" "), &text)
    }

    async fn remove_file(&self, remote_path: &str) -> Result<()> {
        self.shell_check_output(&["rm", "-f", remote_path]).await?;
        Ok(())
    }
}

/// Split a `<output>\n<status>` shell capture and check the status.
fn parse_checked_output(command: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim_end_matches('\n');
    let (body, status_line) = match trimmed.rsplit_once('\n') {
        Some((body, last)) => (body, last),
        None => ("", trimmed),
    };

    let status: i32 =
        status_line
            .trim()
            .parse()
            .map_err(|_| DeviceError::MalformedExitStatus {
                command: command.to_string(),
                tail: status_line.to_string(),
            })?;

    if status != 0 {
        return Err(DeviceError::RemoteCommandFailed {
            command: command.to_string(),
            status,
            output: body.trim().to_string(),
        });
    }
    Ok(body.to_string())
}
