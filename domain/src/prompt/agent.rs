//! Prompt templates for the decision agent

use crate::tool::Toolkit;

/// Name of the variable generated code must bind its answer to.
pub const RESULT_VARIABLE: &str = "result";

/// Templates for generating decision agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System instructions shared by base and sub agents
    pub fn decision_system(toolkit: &Toolkit) -> String {
        let mut prompt = format!(
            r#"You are a highly capable AI agent with a team of sub-agents at your disposal. Your sole objective is to comprehensively answer the question or solve the problem given to you. You may answer directly (optionally by executing code) or dispatch the task to your sub-agents. Only dispatch when the task is genuinely better served by breaking it into several independent steps.

You have three options:

- "dispatch": send the task to sub-agents
- "answer": answer the task directly
- "code_execute": execute Python code

You MUST return a JSON object with the following structure:

- `decision`: one of "dispatch", "answer", or "code_execute"
- `content`: If decision is "dispatch", a list of strings, each a clear and self-contained instruction for one sub-agent. If decision is "answer", a string with the direct answer. If decision is "code_execute", a string of executable Python code that MUST store its final output in a variable called `{RESULT_VARIABLE}`.
"#
        );

        if !toolkit.is_empty() {
            prompt.push_str(&format!(
                r#"
You also have access to the following tools (Python functions already defined in your environment):

{}--------

If you choose "code_execute", you may call these functions directly; they are already in the global namespace.
"#,
                toolkit.render_description()
            ));
        }

        prompt
    }

    /// Memory block carrying the rendered result log
    pub fn memory_block(rendered_log: &str) -> String {
        format!(
            "**RESULT LOG**\n\nResults produced so far by you and other agents in this run:\n\n{}",
            rendered_log
        )
    }

    /// Task for the automatic repair attempt after a failed execution
    pub fn code_repair(task: &str, program: &str, failure: &str) -> String {
        format!(
            r#"The following code execution (for the task: {task}) did NOT work.

```python
{program}
```

Failure: {failure}

Please try again and remember to store the final output in a variable called `{RESULT_VARIABLE}`."#
        )
    }

    /// Log outcome text for a code execution
    pub fn execution_summary(code: &str, result: Option<&str>, stdout: &str) -> String {
        let mut summary = format!(
            "executed the following code\n```python\n{}\n```\nresult: {}",
            code.trim_end(),
            result.unwrap_or("None")
        );
        if !stdout.trim().is_empty() {
            summary.push_str(&format!("\nstdout: {}", stdout.trim_end()));
        }
        summary
    }

    /// Log outcome text for a dispatch
    pub fn dispatch_summary(subtasks: &[&str]) -> String {
        format!("dispatched the following sub-tasks - {}", subtasks.join(", "))
    }

    /// System prompt for the refiner that distils a finished run
    pub fn refiner_system() -> &'static str {
        r#"You are the final step of a team of AI agents. You receive the original task and the log of everything the agents did. Write the single, complete answer the user should receive. Do not describe the process; give the answer."#
    }

    /// User prompt for the refiner
    pub fn refiner_prompt(task: &str, rendered_log: &str) -> String {
        format!(
            r#"Original task: {task}

Agent result log:

{rendered_log}
Based on this log, provide the final answer to the original task."#
        )
    }
}
