//! Execution context passed to module `Init` calls.
//!
//! Carries a cancellation token, an optional deadline, and the output sink
//! modules write their lines to. The loader and registry never look at it;
//! propagating cancellation into module work is the module's job.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use gpd_core::error::AppError;

/// Shared, line-oriented output sink.
#[derive(Clone)]
pub struct Output {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    /// Output bound to the process's standard output.
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    /// Output bound to an arbitrary writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Output that accumulates into memory, plus a handle to read it back.
    pub fn capture() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::from_writer(captured.clone()), captured)
    }

    /// Writes `line` followed by a newline and flushes.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(sink, "{line}")?;
        sink.flush()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// In-memory buffer behind [`Output::capture`].
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Cancellation- and deadline-carrying context for module work.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
    output: Output,
}

impl Context {
    /// A root context: never cancelled, no deadline, writes to stdout.
    pub fn background() -> Self {
        Self::with_output(Output::stdout())
    }

    /// A root context writing to `output`.
    pub fn with_output(output: Output) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
            output,
        }
    }

    /// A child context cancelled whenever `self` is.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
            output: self.output.clone(),
        }
    }

    /// A child context that also expires after `timeout`.
    ///
    /// The earlier of the inherited and the new deadline wins.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut child = self.child();
        let deadline = Instant::now() + timeout;
        child.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        child
    }

    /// Cancels this context and all its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The underlying token, for wiring external signals.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context has been cancelled or its deadline has passed.
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fails with `Cancelled` once the context is done.
    pub fn check(&self) -> Result<(), AppError> {
        if self.token.is_cancelled() {
            return Err(AppError::cancelled("context cancelled"));
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(AppError::cancelled("context deadline exceeded"));
        }
        Ok(())
    }

    /// Writes one line to the context's output.
    pub fn println(&self, line: &str) -> Result<(), AppError> {
        Ok(self.output.write_line(line)?)
    }
}
