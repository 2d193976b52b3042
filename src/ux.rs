use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const BANNER: &str = "terragram - shareable, secret-free infrastructure plans";

/// Print the product banner shown by interactive commands.
pub fn print_head() {
    println!("{BANNER}");
    println!();
}

/// Spinner for one pipeline stage with fixed running/success/fail messages.
pub struct StageSpinner {
    bar: ProgressBar,
    success: &'static str,
    fail: &'static str,
}

impl StageSpinner {
    pub fn start(running: &'static str, success: &'static str, fail: &'static str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("spinner template is valid"),
        );
        bar.set_message(running);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar, success, fail }
    }

    pub fn succeed(self) {
        self.bar.finish_with_message(format!("✔ {}", self.success));
    }

    pub fn fail(self) {
        self.bar.abandon_with_message(format!("✘ {}", self.fail));
    }
}
