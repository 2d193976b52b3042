use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bus::EventBus;
use crate::convert;
use crate::errors::PipelineError;
use crate::events::{Event, EventKind, UI_RECEIVER};
use crate::progress::{ProgressSink, ProgressState};
use crate::runner::Runner;
use crate::strip::{self, RedactionPolicy};

/// Fixed name of the raw artifact the planning engine is told to write.
pub const ARTIFACT_NAME: &str = "terragram.plan";

/// Fixed name of the redacted artifact the pipeline writes on success.
pub const REDACTED_ARTIFACT_NAME: &str = "terragram.plan.json";

/// Requested pipeline operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Plan,
    Destroy,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Plan => "plan",
            Operation::Destroy => "destroy",
        }
    }
}

/// Pipeline stage, also used to label the local progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Planning,
    Converting,
    Stripping,
    Done,
    Aborted,
}

/// Transient record for one pipeline invocation. Owned exclusively by the
/// running pipeline; discarded on completion or failure, never persisted.
pub struct PipelineRun {
    pub id: uuid::Uuid,
    pub operation: Operation,
    pub working_dir: PathBuf,
    pub artifact_path: PathBuf,
    pub stdout: String,
    pub stderr: String,
    pub stage: Stage,
}

impl PipelineRun {
    fn new(operation: Operation, working_dir: PathBuf) -> Self {
        let artifact_path = working_dir.join(ARTIFACT_NAME);
        Self {
            id: uuid::Uuid::new_v4(),
            operation,
            working_dir,
            artifact_path,
            stdout: String::new(),
            stderr: String::new(),
            stage: Stage::Idle,
        }
    }
}

/// Drives the planning engine and the downstream convert/strip stages,
/// reporting progress on two independent channels: a local [`ProgressSink`]
/// and the [`EventBus`].
///
/// Stages run strictly sequentially; any failure aborts the remaining
/// stages and no "end" event is pushed for an aborted run.
pub struct PlanPipeline<R: Runner> {
    bus: Arc<EventBus>,
    runner: R,
    engine: String,
    working_dir: PathBuf,
    policy: RedactionPolicy,
}

impl<R: Runner> PlanPipeline<R> {
    pub fn new(bus: Arc<EventBus>, runner: R, engine: String, working_dir: PathBuf) -> Self {
        Self {
            bus,
            runner,
            engine,
            working_dir,
            policy: RedactionPolicy::default(),
        }
    }

    /// Run the full pipeline for `operation`, returning the path of the
    /// redacted artifact on success or the first stage failure.
    pub fn run(
        &self,
        operation: Operation,
        progress: &mut dyn ProgressSink,
    ) -> Result<PathBuf, PipelineError> {
        let mut run = PipelineRun::new(operation, self.working_dir.clone());
        tracing::info!(run_id = %run.id, operation = operation.as_str(), "pipeline started");

        self.bus.push(Event::lifecycle(
            UI_RECEIVER,
            operation.as_str(),
            EventKind::Begin,
            &run.working_dir,
            run.id,
        ));

        // Planning: invoke the engine, which writes the raw artifact.
        run.stage = Stage::Planning;
        progress.update(Stage::Planning, ProgressState::Running);
        let args = engine_args(operation, &run.artifact_path);
        match self.runner.run(&self.engine, &args, &run.working_dir) {
            Ok(output) => {
                run.stdout = output.stdout;
                run.stderr = output.stderr;
                progress.update(Stage::Planning, ProgressState::Succeeded);
            }
            Err(err) => {
                progress.update(Stage::Planning, ProgressState::Failed);
                return self.abort(run, err);
            }
        }

        run.stage = Stage::Converting;
        progress.update(Stage::Converting, ProgressState::Running);
        let document = match convert::convert(&run.artifact_path) {
            Ok(document) => {
                progress.update(Stage::Converting, ProgressState::Succeeded);
                document
            }
            Err(err) => {
                progress.update(Stage::Converting, ProgressState::Failed);
                return self.abort(run, err);
            }
        };

        run.stage = Stage::Stripping;
        progress.update(Stage::Stripping, ProgressState::Running);
        let redacted_path = match self.strip_and_write(&document, &run.working_dir) {
            Ok(path) => {
                progress.update(Stage::Stripping, ProgressState::Succeeded);
                path
            }
            Err(err) => {
                progress.update(Stage::Stripping, ProgressState::Failed);
                return self.abort(run, err);
            }
        };

        run.stage = Stage::Done;
        self.bus.push(Event::lifecycle(
            UI_RECEIVER,
            operation.as_str(),
            EventKind::End,
            &run.working_dir,
            run.id,
        ));
        tracing::info!(run_id = %run.id, artifact = %redacted_path.display(), "pipeline finished");
        Ok(redacted_path)
    }

    fn strip_and_write(
        &self,
        document: &serde_json::Value,
        working_dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let stripped = strip::strip(document, &self.policy)?;
        let path = working_dir.join(REDACTED_ARTIFACT_NAME);
        let rendered =
            serde_json::to_string_pretty(&stripped).map_err(|err| PipelineError::Redaction {
                reason: format!("could not render redacted artifact: {err}"),
            })?;
        std::fs::write(&path, rendered).map_err(|err| PipelineError::Redaction {
            reason: format!("could not write redacted artifact: {err}"),
        })?;
        Ok(path)
    }

    fn abort(&self, mut run: PipelineRun, err: PipelineError) -> Result<PathBuf, PipelineError> {
        run.stage = Stage::Aborted;
        tracing::warn!(run_id = %run.id, stage = ?run.stage, %err, "pipeline aborted");
        // Intentionally no "end" event: a bus-only consumer sees an
        // unterminated "begin" for failed runs.
        Err(err)
    }
}

fn engine_args(operation: Operation, artifact_path: &Path) -> Vec<String> {
    let mut args = vec![
        "plan".to_string(),
        "-out".to_string(),
        artifact_path.display().to_string(),
    ];
    if operation == Operation::Destroy {
        args.push("-destroy".to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroy_adds_destroy_flag() {
        let path = Path::new("/work/terragram.plan");
        let plan_args = engine_args(Operation::Plan, path);
        assert_eq!(plan_args, ["plan", "-out", "/work/terragram.plan"]);

        let destroy_args = engine_args(Operation::Destroy, path);
        assert_eq!(
            destroy_args,
            ["plan", "-out", "/work/terragram.plan", "-destroy"]
        );
    }
}
