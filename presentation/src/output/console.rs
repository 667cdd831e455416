//! Console output formatter for agent and ensemble results

use colored::Colorize;
use marshall_application::RunAgentOutput;
use marshall_domain::{DecisionKind, DecisionNode, EnsembleResult};
use serde::Serialize;

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Full report for an agent run
    pub fn format_agent(output: &RunAgentOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("Agent Run"));
        out.push('\n');
        out.push_str(&format!("{} {}\n", "Task:".cyan().bold(), output.task));
        out.push_str(&format!(
            "{} {} decisions, depth {}\n",
            "Tree:".cyan().bold(),
            output.tree.decision_count(),
            output.tree.max_depth()
        ));

        out.push_str(&Self::section_header("Call Tree"));
        Self::push_node(&mut out, &output.tree);

        out.push_str(&Self::section_header("Result Log"));
        for (i, entry) in output.result_log.entries().iter().enumerate() {
            out.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {}. {} ──", i + 1, entry.directive).yellow().bold(),
                Self::indent(&entry.outcome, "  ")
            ));
        }

        out.push_str(&Self::section_header("Answer"));
        out.push('\n');
        out.push_str(output.answer().unwrap_or("(no answer)"));
        out.push('\n');
        out.push_str(&Self::footer());
        out
    }

    /// Full report for an ensemble run
    pub fn format_ensemble(result: &EnsembleResult) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("Ensemble Run"));
        out.push('\n');
        out.push_str(&format!("{} {}\n", "Query:".cyan().bold(), result.query));
        out.push_str(&format!(
            "{} {} ({} samples)\n",
            "Strategy:".cyan().bold(),
            result.strategy,
            result.candidates.len()
        ));

        out.push_str(&Self::section_header("Candidates"));
        for (i, candidate) in result.candidates.iter().enumerate() {
            let score = result
                .scores
                .iter()
                .find(|s| s.index == i)
                .map(|s| format!(" score {:.4}", s.score))
                .unwrap_or_default();
            let title = format!("── Agent {}{} ──", i + 1, score);
            let title = if result.selected_index == Some(i) {
                format!("{} {}", title, "(selected)").green().bold()
            } else {
                title.yellow().bold()
            };
            out.push_str(&format!("\n{}\n{}\n", title, candidate));
        }

        out.push_str(&Self::section_header("Answer"));
        out.push('\n');
        out.push_str(&result.answer);
        out.push('\n');
        out.push_str(&Self::footer());
        out
    }

    /// Final answer of an agent run only
    pub fn format_agent_answer(output: &RunAgentOutput) -> String {
        output.answer().unwrap_or_default().to_string()
    }

    /// Format any result as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn push_node(out: &mut String, node: &DecisionNode) {
        let marker = match node.outcome.kind {
            DecisionKind::Answer => "answer".green(),
            DecisionKind::CodeExecute if node.outcome.success => "code".blue(),
            DecisionKind::CodeExecute => "code (failed)".red(),
            DecisionKind::Dispatch => "dispatch".magenta(),
        };
        out.push_str(&format!(
            "{}{} [{}] {}\n",
            "  ".repeat(node.depth),
            marker,
            node.role,
            node.task
        ));
        if node.outcome.repair.is_some() {
            out.push_str(&format!(
                "{}  {}\n",
                "  ".repeat(node.depth),
                "repaired".yellow()
            ));
        }
        for child in &node.children {
            Self::push_node(out, child);
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
