use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::exit;

/// Failure classes of the plan pipeline, one per stage.
///
/// Any of these aborts the remaining stages immediately; no partial artifact
/// is ever exposed to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The planning engine could not be launched or exited non-zero.
    /// `stderr` is the captured diagnostic text, surfaced verbatim.
    #[error("{stderr}")]
    Process { stderr: String },

    /// The raw plan artifact was missing, truncated, or not parseable.
    #[error("could not convert plan artifact {path}: {reason}", path = .path.display())]
    Conversion { path: PathBuf, reason: String },

    /// The structured document could not be redacted.
    #[error("could not redact plan document: {reason}")]
    Redaction { reason: String },
}

impl PipelineError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Process { .. } => exit::PROCESS_FAILURE,
            PipelineError::Conversion { .. } => exit::CONVERSION_FAILURE,
            PipelineError::Redaction { .. } => exit::REDACTION_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_display_is_the_captured_stderr_verbatim() {
        let err = PipelineError::Process {
            stderr: "no resources to destroy".to_string(),
        };
        assert_eq!(err.to_string(), "no resources to destroy");
    }

    #[test]
    fn exit_codes_map_per_failure_class() {
        let process = PipelineError::Process {
            stderr: String::new(),
        };
        let conversion = PipelineError::Conversion {
            path: PathBuf::from("/work/terragram.plan"),
            reason: "artifact is empty".to_string(),
        };
        let redaction = PipelineError::Redaction {
            reason: "unrecognized document structure".to_string(),
        };
        assert_eq!(process.exit_code(), exit::PROCESS_FAILURE);
        assert_eq!(conversion.exit_code(), exit::CONVERSION_FAILURE);
        assert_eq!(redaction.exit_code(), exit::REDACTION_FAILURE);
    }

    #[test]
    fn conversion_display_names_the_artifact_path() {
        let err = PipelineError::Conversion {
            path: PathBuf::from("/work/terragram.plan"),
            reason: "artifact unreadable".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("/work/terragram.plan"));
        assert!(text.contains("artifact unreadable"));
    }
}
