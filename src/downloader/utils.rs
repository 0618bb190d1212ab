// Subprocess helpers and output normalization

use std::process::{ExitStatus, Output, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use lazy_static::lazy_static;
use regex::Regex;

/// Run a command to completion, killing it once `timeout_secs` elapses.
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<Output, String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program, e))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| format!("Failed to capture stdout from {}", program))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| format!("Failed to capture stderr from {}", program))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stderr: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });

    match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status =
                status_res.map_err(|e| format!("Failed to wait for {}: {}", program, e))?;
            let stdout = stdout_task
                .await
                .map_err(|e| format!("stdout task failed: {}", e))??;
            let stderr = stderr_task
                .await
                .map_err(|e| format!("stderr task failed: {}", e))??;
            Ok(Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(format!("Timed out after {}s", timeout_secs))
        }
    }
}

/// Spawn a command and hand every output line (stdout and stderr, as each
/// is produced) to `handler`. Returns the exit status once the process
/// ends; the caller blocks its own worker until then.
pub async fn run_with_live_output<F>(
    program: &str,
    args: &[String],
    mut handler: F,
) -> Result<ExitStatus, String>
where
    F: FnMut(&str),
{
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program, e))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| format!("Failed to capture stdout from {}", program))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| format!("Failed to capture stderr from {}", program))?;

    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();
    let mut out_done = false;
    let mut err_done = false;

    while !(out_done && err_done) {
        tokio::select! {
            line = out_lines.next_line(), if !out_done => {
                match line.map_err(|e| format!("Failed to read stdout: {}", e))? {
                    Some(line) => handler(line.trim_end()),
                    None => out_done = true,
                }
            }
            line = err_lines.next_line(), if !err_done => {
                match line.map_err(|e| format!("Failed to read stderr: {}", e))? {
                    Some(line) => handler(line.trim_end()),
                    None => err_done = true,
                }
            }
        }
    }

    child
        .wait()
        .await
        .map_err(|e| format!("Failed to wait for {}: {}", program, e))
}

lazy_static! {
    static ref ANSI_RE: Regex = Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").unwrap();
}

/// Strip ANSI escape sequences from subprocess output.
pub fn strip_ansi(line: &str) -> String {
    ANSI_RE.replace_all(line, "").into_owned()
}

/// Drop all whitespace; the extractor pads its percentage strings for
/// terminal alignment.
pub fn remove_whitespace(s: &str) -> String {
    s.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_ansi("\x1b[0;94m 12.3%\x1b[0m"), " 12.3%");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn removes_padding_whitespace() {
        assert_eq!(remove_whitespace("  12.3% "), "12.3%");
    }

    #[tokio::test]
    async fn live_output_sees_both_streams() {
        let args = vec![
            "-c".to_string(),
            "echo out; echo err 1>&2".to_string(),
        ];
        let mut lines = Vec::new();
        let status = run_with_live_output("sh", &args, |line| lines.push(line.to_string()))
            .await
            .unwrap();
        assert!(status.success());
        lines.sort();
        assert_eq!(lines, vec!["err".to_string(), "out".to_string()]);
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let args = vec!["10".to_string()];
        let err = run_output_with_timeout("sleep", &args, 1).await.unwrap_err();
        assert!(err.contains("Timed out"));
    }
}
