//! Prompt templates for ensemble reconciliation

/// Templates for the ensemble refiner
pub struct EnsemblePromptTemplate;

impl EnsemblePromptTemplate {
    /// Concatenate sampled answers as `Agent i: ...` blocks
    pub fn numbered_answers(answers: &[String]) -> String {
        let mut out = String::new();
        for (i, answer) in answers.iter().enumerate() {
            out.push_str(&format!("\nAgent {}: {}\n\n---------", i + 1, answer));
        }
        out
    }

    /// System prompt for the refiner
    pub fn refiner_system(query: &str, answers: &[String]) -> String {
        format!(
            "Below is the output of {} agents to the query: {}\n{}\n\nBased on these outputs and the original query, choose the best answer and return it. Do not summarise the outputs; give one clear and concise answer.",
            answers.len(),
            query,
            Self::numbered_answers(answers)
        )
    }

    /// User prompt for the refiner
    pub fn refiner_prompt(query: &str) -> String {
        format!(
            "Given the query **{}** and the outputs above, provide the most helpful response for the user.",
            query
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_answers() {
        let text = EnsemblePromptTemplate::numbered_answers(&["4".into(), "four".into()]);
        assert_eq!(text, "\nAgent 1: 4\n\n---------\nAgent 2: four\n\n---------");
    }

    #[test]
    fn test_refiner_system_counts_agents() {
        let prompt = EnsemblePromptTemplate::refiner_system("2+2?", &["4".into(), "4".into()]);
        assert!(prompt.starts_with("Below is the output of 2 agents to the query: 2+2?"));
    }
}
