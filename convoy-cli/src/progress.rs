// ============================================================================
// convoy-cli/src/progress.rs
// ============================================================================
//
// PROGRESS DISPLAY: Two-Bar Terminal Rendering of Batch Events
//
// TerminalProgress subscribes to the orchestrator's events and draws two
// indicatif bars: the whole batch ("Overall Progress 2/5") and the running
// file ("Converting clip.avi Video: 42.00%"). Finished and failed files are
// printed above the bars as they happen.
//
// KEY COMPONENTS:
// - TerminalProgress: EventHandler driving an indicatif MultiProgress

// ---- External crate imports ----
use convoy_core::utils::display_name;
use convoy_core::{BatchEvent, EventHandler, ProgressSnapshot, format_duration};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;

// ---- Standard library imports ----
use std::time::Duration;

/// Bar length; fractions are mapped onto this many steps.
const BAR_STEPS: u64 = 10_000;

/// Renders batch events as two progress bars on stderr.
pub struct TerminalProgress {
    multi: MultiProgress,
    overall: ProgressBar,
    file: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Builds the bars against `target` (hidden targets are used in tests).
    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let overall = multi.add(ProgressBar::new(BAR_STEPS).with_style(overall_style()));
        let file = multi.add(ProgressBar::new(BAR_STEPS).with_style(file_style()));
        Self { multi, overall, file }
    }

    fn apply_snapshot(&self, snapshot: &ProgressSnapshot) {
        self.overall.set_position(to_steps(snapshot.overall_fraction));
        self.overall.set_message(snapshot.overall_label.clone());
        self.file.set_position(to_steps(snapshot.file_fraction));
        self.file.set_message(snapshot.file_label.clone());
    }

    fn println(&self, line: String) {
        if self.multi.println(line).is_err() {
            log::debug!("Progress display is gone; dropping status line");
        }
    }

    pub fn overall_position(&self) -> u64 {
        self.overall.position()
    }

    pub fn file_message(&self) -> String {
        self.file.message().to_string()
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for TerminalProgress {
    fn handle(&self, event: &BatchEvent) {
        match event {
            BatchEvent::BatchStarted { total, .. } => {
                self.overall.set_message(format!("Overall Progress 0/{total}"));
                self.overall.enable_steady_tick(Duration::from_millis(250));
            }
            BatchEvent::JobStarted { .. } => {}
            BatchEvent::Progress(snapshot) => self.apply_snapshot(snapshot),
            BatchEvent::JobCompleted {
                source,
                output,
                elapsed_secs,
                ..
            } => {
                self.file.set_position(BAR_STEPS);
                self.println(format!(
                    "{} {} -> {} ({})",
                    "✓".green().bold(),
                    display_name(source),
                    output.display(),
                    format_duration(*elapsed_secs)
                ));
            }
            BatchEvent::JobFailed { source, message, .. } => {
                self.println(format!(
                    "{} {}: {}",
                    "✗".red().bold(),
                    display_name(source).bold(),
                    message.red()
                ));
            }
            BatchEvent::BatchFinished(_) => {
                self.file.finish_and_clear();
                self.overall.finish();
            }
        }
    }
}

fn overall_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg:<28} [{bar:40.cyan/blue}] {percent:>3}% | {elapsed_precise}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn file_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg:<28} [{bar:40.green/white}] {percent:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn to_steps(fraction: f64) -> u64 {
    (fraction.clamp(0.0, 1.0) * BAR_STEPS as f64).round() as u64
}
