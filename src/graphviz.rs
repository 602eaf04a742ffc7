// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Running the external Graphviz `dot` tool

use crate::error::GraphError;
use crate::render::OutputFormat;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Executable used when none is configured
#[must_use]
pub fn default_exe() -> &'static str {
    if cfg!(windows) {
        "dot.exe"
    } else {
        "dot"
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The layout tool and how long it may run
#[derive(Debug, Clone)]
pub struct DotTool {
    exe: PathBuf,
    timeout: Duration,
}

impl Default for DotTool {
    fn default() -> Self {
        Self::new(default_exe(), Duration::from_secs(30))
    }
}

impl DotTool {
    /// Tool at `exe`, killed after `timeout`
    pub fn new(exe: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            exe: exe.into(),
            timeout,
        }
    }

    /// Configured executable
    #[must_use]
    pub fn exe(&self) -> &std::path::Path {
        &self.exe
    }

    /// Render DOT text into `format`
    pub fn render(&self, dot: &str, format: OutputFormat) -> Result<Vec<u8>, GraphError> {
        self.run(dot, format.dot_type())
    }

    /// Pipe `input` to `<exe> -T<dot_type>` and collect standard output
    pub fn run(&self, input: &str, dot_type: &str) -> Result<Vec<u8>, GraphError> {
        let tool = self.exe.display().to_string();
        debug!("Running {} -T{}", tool, dot_type);

        let mut child = Command::new(&self.exe)
            .arg(format!("-T{dot_type}"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdin = child.stdin.take();
        let bytes = input.as_bytes().to_vec();
        let writer = thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&bytes)?;
            }
            Ok(())
        });
        let stdout = read_in_background(child.stdout.take());
        let stderr = read_in_background(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                warn!("{} exceeded {:?}, killing it", tool, self.timeout);
                // The process may already have exited between the checks
                let _ = child.kill();
                let _ = child.wait();
                return Err(GraphError::ToolTimedOut {
                    tool,
                    secs: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        if let Ok(Err(e)) = writer.join() {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        let stdout = join_reader(stdout)?;
        let stderr = join_reader(stderr)?;

        if !status.success() {
            return Err(GraphError::ToolFailed {
                tool,
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        debug!("{} produced {} bytes", tool, stdout.len());
        Ok(stdout)
    }
}

type Reader = thread::JoinHandle<io::Result<Vec<u8>>>;

fn read_in_background<R: Read + Send + 'static>(source: Option<R>) -> Reader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut source) = source {
            source.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join_reader(handle: Reader) -> Result<Vec<u8>, GraphError> {
    handle
        .join()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "output reader panicked"))?
        .map_err(GraphError::from)
}
