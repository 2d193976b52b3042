use std::path::Path;

use crate::errors::PipelineError;

/// Read the raw plan artifact and parse it into a structured document ready
/// for redaction. The artifact format is owned by the planning engine; all
/// this layer requires is valid JSON.
pub fn convert(artifact_path: &Path) -> Result<serde_json::Value, PipelineError> {
    let raw = std::fs::read(artifact_path).map_err(|err| PipelineError::Conversion {
        path: artifact_path.to_path_buf(),
        reason: format!("artifact unreadable: {err}"),
    })?;

    if raw.is_empty() {
        return Err(PipelineError::Conversion {
            path: artifact_path.to_path_buf(),
            reason: "artifact is empty".to_string(),
        });
    }

    serde_json::from_slice(&raw).map_err(|err| PipelineError::Conversion {
        path: artifact_path.to_path_buf(),
        reason: format!("artifact is not valid plan JSON: {err}"),
    })
}
