use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command as StdCommand, Output, Stdio};

use crate::caps::PlatformCaps;
use crate::error::{Error, Result};

/// A fire-and-wait process invocation with stdin fed from memory.
#[derive(Debug)]
pub struct Command {
    inner:          StdCommand,
    stdin:          Vec<u8>,
    capture_stdout: bool,
}

impl Command {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            inner:          StdCommand::new(program),
            stdin:          Vec::new(),
            capture_stdout: true,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.inner.current_dir(dir);
        self
    }

    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = input.into();
        self
    }

    pub fn capture_stdout(mut self, capture: bool) -> Self {
        self.capture_stdout = capture;
        self
    }

    #[cfg(windows)]
    pub fn caps(mut self, caps: &PlatformCaps) -> Self {
        use std::os::windows::process::CommandExt;
        self.inner.creation_flags(caps.creation_flags);
        self
    }

    #[cfg(not(windows))]
    pub fn caps(self, _caps: &PlatformCaps) -> Self { self }

    /// Program and arguments, for error messages.
    pub fn display(&self) -> String {
        let mut out = self.inner.get_program().to_string_lossy().into_owned();
        for arg in self.inner.get_args() {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }

    /// Run to completion. A non-zero exit is an error carrying stderr.
    pub fn run(mut self) -> Result<Output> {
        let cmd = self.display();
        let stdout = if self.capture_stdout {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = self
            .inner
            .stdin(Stdio::piped())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::CommandFailed {
                cmd:    cmd.clone(),
                source: e,
            })?;

        tracing::debug!(%cmd, "spawned");

        let input = std::mem::take(&mut self.stdin);
        let pipe = child.stdin.take();
        let (output, written) = std::thread::scope(|s| {
            let writer = s.spawn(move || match pipe {
                Some(mut pipe) => pipe.write_all(&input),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output.map_err(|e| Error::CommandFailed {
            cmd:    cmd.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(Error::CommandStatus {
                cmd,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match written {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!(%cmd, "stdin closed before all input was written");
            }
            Err(e) => {
                tracing::debug!(%cmd, error = %e, "failed to write stdin");
                return Err(Error::Stdin { cmd, source: e });
            }
            Ok(()) => {}
        }

        Ok(output)
    }
}
