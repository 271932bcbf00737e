use std::process::{Command, Stdio};

use crate::error::AlignmentError;

/// Run an external tool to completion. A spawn failure or a non-zero exit
/// becomes `ExternalTool`, carrying the exit status and trimmed stderr.
pub(crate) fn run_tool(tool: &str, command: &mut Command) -> Result<(), AlignmentError> {
    tracing::debug!(tool, command = ?command, "running external tool");
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| AlignmentError::external_tool(tool, format!("could not start: {e}")))?;

    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    Err(AlignmentError::external_tool(
        tool,
        if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            format!("exited with {}: {stderr}", output.status)
        },
    ))
}
