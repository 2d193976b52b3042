use std::path::Path;
use std::process::{Command, Stdio};

use crate::errors::PipelineError;

/// Captured output of a finished external program.
#[derive(Debug, Default)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Seam for invoking the planning engine, so the pipeline can be exercised
/// without a real executable.
pub trait Runner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<RunOutput, PipelineError>;
}

/// Runs the external program as a child process.
///
/// Stdin is inherited so interactive prompts from the engine still work;
/// stdout and stderr are captured into independent buffers. The call blocks
/// until the program exits; callers own any timeout policy.
pub struct CommandRunner;

impl Runner for CommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<RunOutput, PipelineError> {
        tracing::debug!(program, ?args, dir = %working_dir.display(), "launching planning engine");
        let child = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| PipelineError::Process {
                stderr: format!("{program} could not be launched: {err}"),
            })?;

        let output = child
            .wait_with_output()
            .map_err(|err| PipelineError::Process {
                stderr: format!("{program} did not finish: {err}"),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!(status = ?output.status.code(), "planning engine failed");
            return Err(PipelineError::Process { stderr });
        }

        Ok(RunOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_process_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandRunner
            .run("terragram-no-such-engine", &[], dir.path())
            .unwrap_err();
        match err {
            PipelineError::Process { stderr } => {
                assert!(stderr.contains("could not be launched"));
                assert!(stderr.contains("terragram-no-such-engine"));
            }
            other => panic!("expected process failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn captures_streams_independently() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec![
            "-c".to_string(),
            "echo to-stdout; echo to-stderr 1>&2".to_string(),
        ];
        let output = CommandRunner.run("sh", &args, dir.path()).unwrap();
        assert_eq!(output.stdout.trim(), "to-stdout");
        assert_eq!(output.stderr.trim(), "to-stderr");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_carries_captured_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec![
            "-c".to_string(),
            "echo no resources to destroy 1>&2; exit 1".to_string(),
        ];
        let err = CommandRunner.run("sh", &args, dir.path()).unwrap_err();
        match err {
            PipelineError::Process { stderr } => {
                assert!(stderr.contains("no resources to destroy"));
            }
            other => panic!("expected process failure, got {other:?}"),
        }
    }
}
