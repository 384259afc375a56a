//! Production runner that drives the engine as a child process.
//!
//! # Design
//! - Spawns are gated by a semaphore; time spent waiting for a slot is not charged
//!   against the run's wall-clock budget.
//! - stdout/stderr are drained on their own tasks while the process is awaited so a
//!   chatty engine cannot stall on a full pipe.
//! - One deadline covers the wait and both drains. On timeout the child is killed
//!   and reaped if still alive, the readers are aborted, and partial output is discarded.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use encrypty_config::EngineSettings;
use encrypty_telemetry::{Metrics, engine_run_span, saturating_ms};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, info, warn};
use uuid::Uuid;

use crate::directive::EngineDirective;
use crate::error::{EngineError, EngineResult};
use crate::locator::EngineLocator;
use crate::outcome::{EngineOutcome, InvocationState, RunMode};
use crate::runner::EngineRunner;

type PipeReader = JoinHandle<io::Result<Vec<u8>>>;

/// Runs the external engine executable with a hard timeout.
#[derive(Clone)]
pub struct ProcessEngine {
    locator: EngineLocator,
    timeout: Duration,
    permits: Arc<Semaphore>,
    metrics: Metrics,
}

impl ProcessEngine {
    /// Construct a runner for the given executable location and limits.
    #[must_use]
    pub fn new(
        locator: EngineLocator,
        timeout: Duration,
        max_concurrent: usize,
        metrics: Metrics,
    ) -> Self {
        Self {
            locator,
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            metrics,
        }
    }

    /// Construct a runner from engine settings.
    #[must_use]
    pub fn from_settings(settings: &EngineSettings, metrics: Metrics) -> Self {
        Self::new(
            EngineLocator::from_settings(settings),
            settings.timeout,
            settings.max_concurrent,
            metrics,
        )
    }

    /// Executable location used by this runner.
    #[must_use]
    pub const fn locator(&self) -> &EngineLocator {
        &self.locator
    }

    fn spawn(&self, executable: &std::path::Path) -> EngineResult<Child> {
        Command::new(executable)
            .current_dir(self.locator.install_dir())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: executable.to_path_buf(),
                source,
            })
    }

    async fn supervise(
        &self,
        run_id: Uuid,
        mut child: Child,
        directive: &EngineDirective,
    ) -> EngineResult<EngineOutcome> {
        let mut stdout = spawn_reader(child.stdout.take());
        let mut stderr = spawn_reader(child.stderr.take());

        if let Err(err) = write_directive(child.stdin.take(), &directive.render()).await {
            abort_child(run_id, &mut child, &stdout, &stderr).await;
            return Err(EngineError::io("engine.write_directive", err));
        }

        // The deadline covers the drains too: a helper the engine left behind can
        // hold the pipes open long after the engine itself exits.
        let finished = tokio::time::timeout(self.timeout, async {
            let status = child
                .wait()
                .await
                .map_err(|err| EngineError::io("engine.wait", err))?;
            let stdout = collect_pipe(&mut stdout, "engine.read_stdout").await?;
            let stderr = collect_pipe(&mut stderr, "engine.read_stderr").await?;
            Ok::<_, EngineError>(EngineOutcome {
                exit_code: exit_code(status),
                stdout,
                stderr,
            })
        })
        .await;

        match finished {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => {
                abort_child(run_id, &mut child, &stdout, &stderr).await;
                Err(err)
            }
            Err(_) => {
                abort_child(run_id, &mut child, &stdout, &stderr).await;
                Err(EngineError::TimedOut {
                    timeout: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl EngineRunner for ProcessEngine {
    async fn run(&self, directive: &EngineDirective, mode: RunMode) -> EngineResult<EngineOutcome> {
        let run_id = Uuid::new_v4();
        let span = engine_run_span(
            &run_id.to_string(),
            mode.as_str(),
            directive.action().as_str(),
        );
        self.invoke(run_id, directive, mode, &span)
            .instrument(span.clone())
            .await
    }

    fn is_available(&self) -> bool {
        self.locator.locate().is_ok()
    }
}

impl ProcessEngine {
    async fn invoke(
        &self,
        run_id: Uuid,
        directive: &EngineDirective,
        mode: RunMode,
        span: &Span,
    ) -> EngineResult<EngineOutcome> {
        let executable = match self.locator.locate() {
            Ok(path) => path,
            Err(err) => {
                warn!(
                    run_id = %run_id,
                    mode = mode.as_str(),
                    path = %self.locator.executable_path().display(),
                    state = InvocationState::FailedToStart.as_str(),
                    "engine.failed_to_start: executable missing"
                );
                self.metrics
                    .record_engine_outcome(mode.as_str(), InvocationState::FailedToStart.as_str());
                return Err(err);
            }
        };

        let _permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| EngineError::Closed)?;

        let child = match self.spawn(&executable) {
            Ok(child) => child,
            Err(err) => {
                warn!(
                    run_id = %run_id,
                    mode = mode.as_str(),
                    error = %err,
                    state = InvocationState::FailedToStart.as_str(),
                    "engine.failed_to_start: spawn refused"
                );
                self.metrics
                    .record_engine_outcome(mode.as_str(), InvocationState::FailedToStart.as_str());
                return Err(err);
            }
        };

        let started = Instant::now();
        self.metrics.engine_run_started();
        let pid = child.id().unwrap_or_default();
        span.record("pid", pid);
        info!(
            run_id = %run_id,
            mode = mode.as_str(),
            action = directive.action().as_str(),
            target = %directive.target().display(),
            pid,
            state = InvocationState::Running.as_str(),
            "engine.spawned"
        );

        let result = self.supervise(run_id, child, directive).await;
        let elapsed = started.elapsed();
        let elapsed_ms = saturating_ms(elapsed);
        let state = match &result {
            Ok(outcome) => {
                info!(
                    run_id = %run_id,
                    exit_code = outcome.exit_code,
                    elapsed_ms,
                    state = InvocationState::Completed.as_str(),
                    "engine.completed"
                );
                InvocationState::Completed
            }
            Err(EngineError::TimedOut { timeout }) => {
                warn!(
                    run_id = %run_id,
                    timeout_secs = timeout.as_secs(),
                    elapsed_ms,
                    state = InvocationState::TimedOut.as_str(),
                    "engine.timed_out"
                );
                InvocationState::TimedOut
            }
            Err(err) => {
                warn!(
                    run_id = %run_id,
                    error = %err,
                    elapsed_ms,
                    state = InvocationState::Aborted.as_str(),
                    "engine.aborted"
                );
                InvocationState::Aborted
            }
        };
        self.metrics
            .engine_run_finished(mode.as_str(), outcome_label(state, &result), elapsed);
        result
    }
}

fn outcome_label(state: InvocationState, result: &EngineResult<EngineOutcome>) -> &'static str {
    match result {
        Ok(outcome) if outcome.is_success() => "success",
        Ok(_) => "nonzero_exit",
        Err(_) => state.as_str(),
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> PipeReader
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buffer).await?;
        }
        Ok(buffer)
    })
}

async fn collect_pipe(reader: &mut PipeReader, operation: &'static str) -> EngineResult<String> {
    let bytes = reader
        .await
        .map_err(|err| EngineError::io(operation, io::Error::other(err)))?
        .map_err(|err| EngineError::io(operation, err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Send the directive and close stdin. An engine that exits without reading
/// surfaces as a broken pipe, which is left for the exit status to judge.
async fn write_directive(stdin: Option<ChildStdin>, payload: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    let written = match stdin.write_all(payload.as_bytes()).await {
        Ok(()) => stdin.shutdown().await,
        Err(err) => Err(err),
    };
    match written {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!("engine closed stdin before reading the full directive");
            Ok(())
        }
        other => other,
    }
}

async fn abort_child(run_id: Uuid, child: &mut Child, stdout: &PipeReader, stderr: &PipeReader) {
    match child.try_wait() {
        Ok(Some(status)) => {
            warn!(
                run_id = %run_id,
                exit_code = exit_code(status),
                "engine exited but its output pipes stayed open"
            );
        }
        _ => {
            if let Err(err) = child.kill().await {
                warn!(run_id = %run_id, error = %err, "failed to kill engine process");
            }
        }
    }
    // Grandchildren may still hold the pipes open.
    stdout.abort();
    stderr.abort();
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
