//! Progress reporting for agent and ensemble runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use marshall_application::AgentProgressNotifier;
use marshall_domain::core::string::{first_line, truncate};
use marshall_domain::{AgentRole, DecisionKind, ReconcileStrategy, Task};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with indicatif spinners and bars
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner: Mutex<Option<ProgressBar>>,
    samples_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            spinner: Mutex::new(None),
            samples_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn samples_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn set_message(&self, prefix: String, message: String) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        let pb = slot.get_or_insert_with(|| {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_prefix(prefix);
        pb.set_message(message);
    }

    /// Print a line above the active bars
    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }

    fn finish(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
        if let Ok(mut slot) = self.samples_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgressNotifier for ProgressReporter {
    fn on_decision_start(&self, task: &Task, role: AgentRole, depth: usize) {
        self.set_message(
            format!("{} agent (depth {})", role, depth),
            truncate(first_line(task.content()), 60),
        );
    }

    fn on_decision(&self, task: &Task, kind: DecisionKind, depth: usize) {
        self.println(format!(
            "{}{} {} {}",
            "  ".repeat(depth),
            "→".blue(),
            kind.as_str().bold(),
            truncate(first_line(task.content()), 60).dimmed()
        ));
    }

    fn on_code_executed(&self, task: &Task, success: bool) {
        let status = if success { "✓".green() } else { "✗".red() };
        self.set_message(
            "executed".to_string(),
            format!("{} {}", status, truncate(task.content(), 50)),
        );
    }

    fn on_repair(&self, task: &Task) {
        self.println(format!(
            "  {} repairing: {}",
            "↻".yellow(),
            truncate(task.content(), 60)
        ));
    }

    fn on_refine_start(&self) {
        self.set_message("refiner".to_string(), "writing final answer".to_string());
    }

    fn on_ensemble_start(&self, samples: usize) {
        let pb = self.multi.add(ProgressBar::new(samples as u64));
        pb.set_style(Self::samples_style());
        pb.set_prefix("Sampling");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.samples_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_sample_complete(&self, index: usize, success: bool) {
        if let Ok(slot) = self.samples_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} agent {}", "v".green(), index + 1)
            } else {
                format!("{} agent {}", "x".red(), index + 1)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_reconcile_start(&self, strategy: ReconcileStrategy) {
        if let Ok(mut slot) = self.samples_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message("samples complete".green().to_string());
        }
        self.set_message("Reconciling".to_string(), strategy.to_string());
    }

    fn on_ensemble_complete(&self, _selected_index: Option<usize>) {
        self.finish();
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl AgentProgressNotifier for SimpleProgress {
    fn on_decision(&self, task: &Task, kind: DecisionKind, depth: usize) {
        eprintln!(
            "{}{} {}: {}",
            "  ".repeat(depth),
            "->".cyan(),
            kind.as_str().bold(),
            task
        );
    }

    fn on_code_executed(&self, _task: &Task, success: bool) {
        if success {
            eprintln!("  {} code produced a result", "v".green());
        } else {
            eprintln!("  {} code failed", "x".red());
        }
    }

    fn on_repair(&self, task: &Task) {
        eprintln!("  {} repairing: {}", "->".yellow(), task);
    }

    fn on_refine_start(&self) {
        eprintln!("{} refining final answer", "->".cyan());
    }

    fn on_ensemble_start(&self, samples: usize) {
        eprintln!("{} {} ({} samples)", "->".cyan(), "Sampling".bold(), samples);
    }

    fn on_sample_complete(&self, index: usize, success: bool) {
        if success {
            eprintln!("  {} agent {}", "v".green(), index + 1);
        } else {
            eprintln!("  {} agent {} (failed)", "x".red(), index + 1);
        }
    }

    fn on_reconcile_start(&self, strategy: ReconcileStrategy) {
        eprintln!("{} {} ({})", "->".cyan(), "Reconciling".bold(), strategy);
    }

    fn on_ensemble_complete(&self, selected_index: Option<usize>) {
        if let Some(i) = selected_index {
            eprintln!("  {} selected agent {}", "v".green(), i + 1);
        }
    }
}
