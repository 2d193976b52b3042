use crate::pipeline::Stage;
use crate::ux::StageSpinner;

/// Observable state of one pipeline stage on the local indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Running,
    Succeeded,
    Failed,
}

/// Local, synchronous progress channel. Independent of the event bus: it
/// needs no consumer and is driven from the same state-machine transitions.
pub trait ProgressSink {
    fn update(&mut self, stage: Stage, state: ProgressState);
}

/// Terminal implementation: one spinner per stage.
pub struct TermProgress {
    active: Option<StageSpinner>,
}

impl TermProgress {
    pub fn new() -> Self {
        Self { active: None }
    }
}

impl Default for TermProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TermProgress {
    fn update(&mut self, stage: Stage, state: ProgressState) {
        match state {
            ProgressState::Running => {
                let (running, success, fail) = stage_labels(stage);
                self.active = Some(StageSpinner::start(running, success, fail));
            }
            ProgressState::Succeeded => {
                if let Some(spinner) = self.active.take() {
                    spinner.succeed();
                }
            }
            ProgressState::Failed => {
                if let Some(spinner) = self.active.take() {
                    spinner.fail();
                }
            }
        }
    }
}

fn stage_labels(stage: Stage) -> (&'static str, &'static str, &'static str) {
    match stage {
        Stage::Planning => (
            "Generating execution plan",
            "Execution plan generated",
            "Couldn't generate execution plan",
        ),
        Stage::Converting => (
            "Converting plan artifact",
            "Plan artifact converted",
            "Converting plan artifact failed",
        ),
        Stage::Stripping => (
            "Stripping secrets",
            "Secrets stripped",
            "Stripping secrets failed",
        ),
        // These states never drive the indicator.
        Stage::Idle | Stage::Done | Stage::Aborted => ("Working", "Done", "Failed"),
    }
}
