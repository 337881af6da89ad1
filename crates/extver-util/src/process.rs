use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::errors::ExtverError;
use crate::fs::first_line;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting program, arguments, environment variables,
/// working directory and an optional wall-clock limit. Both output streams are
/// captured.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

/// Captured result of a finished process.
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// First line of the combined output: stdout when it produced anything,
    /// stderr otherwise.
    pub fn first_line(&self) -> &str {
        if self.stdout.is_empty() {
            first_line(&self.stderr)
        } else {
            first_line(&self.stdout)
        }
    }
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory for the child process.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Kill the child and fail if it runs longer than `limit`.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Execute the command, wait for it and return its captured output.
    pub fn exec(&self) -> Result<CapturedOutput, ExtverError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit, &self.program)?,
            None => child.wait()?,
        };

        Ok(CapturedOutput {
            status,
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

fn drain<R: Read + Send + 'static>(source: Option<R>) -> Option<JoinHandle<String>> {
    source.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

fn wait_with_deadline(
    child: &mut Child,
    limit: Duration,
    program: &str,
) -> Result<ExitStatus, ExtverError> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("`{program}` did not finish within {}s", limit.as_secs_f32()),
            )
            .into());
        }
        thread::sleep(POLL_INTERVAL);
    }
}
