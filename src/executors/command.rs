use crate::core::errors::{ExecError, ReconError};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

const SHELL: &str = "sh";

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub name: String,
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turns a non-zero exit into the per-item failure the pipelines record.
    pub fn into_failure(self) -> Option<ExecError> {
        if self.success() {
            return None;
        }
        // nmap reports some fatal errors on stdout
        let detail = if self.stderr.is_empty() { &self.stdout } else { &self.stderr };
        Some(ExecError::new(self.name, self.command, Some(self.exit_code), detail))
    }
}

/// Runs `command_line` through the shell and waits for it. No timeout: the
/// process always runs to completion. A non-zero exit is returned, not raised.
pub async fn execute(name: &str, command_line: &str) -> Result<CommandResult, ReconError> {
    let start = Instant::now();

    tracing::debug!("Executing [{}]: {}", name, command_line);

    let mut child = shell(command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| spawn_failed(name, source))?;

    let stdout_handle = child.stdout.take().ok_or_else(|| missing_pipe(name, "stdout"))?;
    let stderr_handle = child.stderr.take().ok_or_else(|| missing_pipe(name, "stderr"))?;

    // Drain both pipes while waiting so a chatty tool cannot stall on a full buffer
    let (stdout, stderr, status) = tokio::join!(
        read_all(stdout_handle),
        read_all(stderr_handle),
        child.wait()
    );

    let exit_code = status?.code().unwrap_or(-1);
    log_exit(name, exit_code, start);

    Ok(CommandResult {
        name: name.to_string(),
        command: command_line.to_string(),
        exit_code,
        stdout: stdout?,
        stderr: stderr?,
    })
}

/// Runs `producer | consumer` as two processes joined by a pipe, so the
/// producer's own exit status is not hidden behind the consumer's. The result
/// carries the producer's code when it failed, otherwise the consumer's, and
/// the stderr of both. Stdout is the consumer's.
pub async fn execute_pipeline(name: &str, producer: &str, consumer: &str) -> Result<CommandResult, ReconError> {
    let start = Instant::now();
    let command_line = format!("{} | {}", producer, consumer);

    tracing::debug!("Executing [{}]: {}", name, command_line);

    let mut upstream = shell(producer)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| spawn_failed(name, source))?;

    let producer_out = upstream.stdout.take().ok_or_else(|| missing_pipe(name, "stdout"))?;
    let pipe = TryInto::<Stdio>::try_into(producer_out).map_err(|source| spawn_failed(name, source))?;

    let mut downstream = match shell(consumer)
        .stdin(pipe)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(source) => {
            if let Err(e) = upstream.kill().await {
                tracing::debug!("[{}] could not stop producer: {}", name, e);
            }
            return Err(spawn_failed(name, source));
        }
    };

    let upstream_err = upstream.stderr.take().ok_or_else(|| missing_pipe(name, "stderr"))?;
    let downstream_out = downstream.stdout.take().ok_or_else(|| missing_pipe(name, "stdout"))?;
    let downstream_err = downstream.stderr.take().ok_or_else(|| missing_pipe(name, "stderr"))?;

    let (producer_err, stdout, consumer_err, producer_status, consumer_status) = tokio::join!(
        read_all(upstream_err),
        read_all(downstream_out),
        read_all(downstream_err),
        upstream.wait(),
        downstream.wait()
    );

    let producer_code = producer_status?.code().unwrap_or(-1);
    let consumer_code = consumer_status?.code().unwrap_or(-1);
    if producer_code != 0 {
        tracing::debug!("[{}] producer exited with {}", name, producer_code);
    }
    let exit_code = if producer_code != 0 { producer_code } else { consumer_code };
    log_exit(name, exit_code, start);

    let stderr: Vec<String> = [producer_err?, consumer_err?]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    Ok(CommandResult {
        name: name.to_string(),
        command: command_line,
        exit_code,
        stdout: stdout?,
        stderr: stderr.join("\n"),
    })
}

fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c").arg(command_line);
    cmd
}

fn log_exit(name: &str, exit_code: i32, start: Instant) {
    tracing::debug!(
        "[{}] exited with {} after {}ms",
        name,
        exit_code,
        start.elapsed().as_millis()
    );
}

fn spawn_failed(name: &str, source: std::io::Error) -> ReconError {
    ReconError::Spawn { name: name.to_string(), source }
}

fn missing_pipe(name: &str, stream: &str) -> ReconError {
    spawn_failed(name, std::io::Error::other(format!("{} pipe unavailable", stream)))
}

/// Whole stream, trimmed. Bytes that are not UTF-8 are replaced, not rejected.
async fn read_all<R>(mut reader: R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

/// Quotes one word for safe interpolation into a shell command line.
pub fn quote(word: &str) -> String {
    shell_words::quote(word).into_owned()
}
