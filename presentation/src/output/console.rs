//! Console output formatter for council results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::{
    Conversation, ConversationSummary, CouncilResult, LabelMap, PeerRanking, TurnRole,
};
use std::fmt::Write;

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete council result
    pub fn format(question: &str, result: &CouncilResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Council Results"));
        output.push('\n');

        let _ = writeln!(output, "{} {}\n", "Question:".cyan().bold(), question);

        if result.is_total_failure() {
            output.push_str(&Self::section_header("Stage 1: Individual Responses"));
            let _ = writeln!(output, "\n{}", result.stage3.text.red());
            output.push_str(&Self::footer());
            return output;
        }

        // Stage 1: Individual responses
        output.push_str(&Self::section_header("Stage 1: Individual Responses"));
        for answer in &result.stage1 {
            let _ = writeln!(
                output,
                "\n{}\n{}",
                format!("── {} ──", answer.model).yellow().bold(),
                answer.text
            );
        }

        // Stage 2: Peer rankings, shown with real names
        output.push_str(&Self::section_header("Stage 2: Peer Rankings"));
        let label_map = &result.metadata.label_map;
        let _ = writeln!(
            output,
            "\n{}",
            "Answers were anonymized for ranking as:".dimmed()
        );
        for (label, model) in label_map.iter() {
            let _ = writeln!(output, "  {} = {}", label, model);
        }
        if result.stage2.is_empty() {
            let _ = writeln!(output, "\n{}", "No peer rankings were collected.".dimmed());
        }
        for ranking in &result.stage2 {
            let _ = writeln!(
                output,
                "\n{}\n{}",
                format!("── {}'s evaluation ──", ranking.model).yellow().bold(),
                Self::deanonymize_text(&ranking.raw_text, label_map)
            );
            let _ = writeln!(
                output,
                "\n{} {}",
                "Extracted ranking:".cyan(),
                Self::extracted_ranking(ranking, label_map)
            );
        }

        // Aggregate consensus
        if !result.metadata.aggregate_ranking.is_empty() {
            let _ = writeln!(output, "\n{}", "Aggregate Rankings:".green().bold());
            for (i, entry) in result.metadata.aggregate_ranking.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "  {}. {:<30} avg rank {:.2}  ({} {})",
                    i + 1,
                    entry.model.to_string(),
                    entry.average_rank,
                    entry.vote_count,
                    if entry.vote_count == 1 { "vote" } else { "votes" }
                );
            }
        }

        // Stage 3: Synthesis
        output.push_str(&Self::section_header("Stage 3: Final Synthesis"));
        let chairman = format!("Chairman: {}", result.stage3.model).yellow().bold();
        if result.stage3.failed {
            let _ = writeln!(output, "\n{}\n\n{}", chairman, result.stage3.text.red());
        } else {
            let _ = writeln!(output, "\n{}\n\n{}", chairman, result.stage3.text);
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON: the full result bundle plus the question
    pub fn format_json(question: &str, result: &CouncilResult) -> String {
        let mut value = serde_json::to_value(result).unwrap_or_default();
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "question".to_string(),
                serde_json::Value::String(question.to_string()),
            );
        }
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format synthesis only (concise output)
    pub fn format_synthesis_only(result: &CouncilResult) -> String {
        if result.stage3.failed {
            format!("{}\n", result.stage3.text.red())
        } else {
            format!("{}\n", result.stage3.text)
        }
    }

    /// A saved conversation, turn by turn
    pub fn format_history(conversation: &Conversation) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "{} {}",
            conversation.title.cyan().bold(),
            format!("({})", conversation.id).dimmed()
        );
        if conversation.is_empty() {
            let _ = writeln!(output, "{}", "No messages yet.".dimmed());
        }
        for turn in &conversation.turns {
            match turn.role {
                TurnRole::User => {
                    let _ = writeln!(output, "\n{} {}", ">>>".green().bold(), turn.content);
                }
                TurnRole::Assistant => {
                    let _ = writeln!(output, "\n{}", turn.content);
                }
            }
        }
        output
    }

    /// Saved conversations, one per line
    pub fn format_conversation_list(summaries: &[ConversationSummary]) -> String {
        if summaries.is_empty() {
            return "No saved conversations.\n".to_string();
        }
        let mut output = String::new();
        for summary in summaries {
            let _ = writeln!(
                output,
                "{}  {}  {}",
                summary.id.cyan(),
                summary.title,
                format!("({} messages)", summary.message_count).dimmed()
            );
        }
        output
    }

    /// Replace `Response X` labels with model names
    pub fn deanonymize_text(text: &str, label_map: &LabelMap) -> String {
        label_map
            .iter()
            .fold(text.to_string(), |acc, (label, model)| {
                acc.replace(&label.to_string(), model.short_name())
            })
    }

    fn extracted_ranking(ranking: &PeerRanking, label_map: &LabelMap) -> String {
        if !ranking.has_ranking() {
            return "none found".dimmed().to_string();
        }
        ranking
            .parsed_order
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let name = label_map
                    .resolve(*label)
                    .map(|m| m.short_name().to_string())
                    .unwrap_or_else(|| label.to_string());
                format!("{}. {}", i + 1, name)
            })
            .collect::<Vec<_>>()
            .join("  ")
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
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, question: &str, result: &CouncilResult) -> String {
        Self::format(question, result)
    }

    fn format_json(&self, question: &str, result: &CouncilResult) -> String {
        Self::format_json(question, result)
    }

    fn format_synthesis_only(&self, result: &CouncilResult) -> String {
        Self::format_synthesis_only(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        ChairmanResult, CouncilMetadata, Label, Model, OutputFormat, PanelAnswer,
        aggregate_rankings, anonymize, parse_ranking,
    };

    fn result() -> CouncilResult {
        let stage1 = vec![
            PanelAnswer::new(Model::new("openai/gpt-5.1"), "Answer from GPT."),
            PanelAnswer::new(Model::new("x-ai/grok-4"), "Answer from Grok."),
        ];
        let label_map = anonymize(&stage1);
        let text = "Response B is stronger than Response A.\n\nFINAL RANKING:\n1. Response B\n2. Response A";
        let stage2 = vec![PeerRanking::new(
            Model::new("openai/gpt-5.1"),
            text,
            parse_ranking(text),
        )];
        let aggregate = aggregate_rankings(&stage2, &label_map);
        CouncilResult::new(
            stage1,
            stage2,
            ChairmanResult::success(Model::new("google/gemini-3-pro-preview"), "Final answer."),
            CouncilMetadata {
                label_map,
                aggregate_ranking: aggregate,
            },
        )
    }

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_full_output_deanonymizes_rankings() {
        no_color();
        let output = ConsoleFormatter::format("What is Rust?", &result());

        assert!(output.contains("Question: What is Rust?"));
        assert!(output.contains("Answer from GPT."));
        assert!(output.contains("grok-4 is stronger than gpt-5.1."));
        assert!(output.contains("Extracted ranking: 1. grok-4  2. gpt-5.1"));
        assert!(output.contains("avg rank 1.00"));
        assert!(output.contains("Chairman: google/gemini-3-pro-preview"));
        assert!(output.contains("Final answer."));
    }

    #[test]
    fn test_total_failure_output() {
        no_color();
        let failed = CouncilResult::total_failure();
        let output = ConsoleFormatter::format("Q", &failed);
        assert!(output.contains(&failed.stage3.text));
        assert!(!output.contains("Stage 3"));
    }

    #[test]
    fn test_synthesis_only() {
        no_color();
        assert_eq!(ConsoleFormatter::format_synthesis_only(&result()), "Final answer.\n");
    }

    #[test]
    fn test_json_includes_question_and_metadata() {
        let json = ConsoleFormatter.render(OutputFormat::Json, "What is Rust?", &result());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["question"], "What is Rust?");
        assert_eq!(value["stage1"].as_array().unwrap().len(), 2);
        assert_eq!(value["stage3"]["text"], "Final answer.");
        assert_eq!(value["metadata"]["label_map"]["Response A"], "openai/gpt-5.1");
        assert_eq!(
            value["metadata"]["aggregate_ranking"][0]["model"],
            "x-ai/grok-4"
        );
    }

    #[test]
    fn test_extracted_ranking_without_order() {
        no_color();
        let ranking = PeerRanking::new(Model::new("a/b"), "no idea", Vec::new());
        let map = anonymize(&[PanelAnswer::new(Model::new("a/b"), "x")]);
        assert_eq!(
            ConsoleFormatter::extracted_ranking(&ranking, &map),
            "none found"
        );
        let ranking = PeerRanking::new(
            Model::new("a/b"),
            "",
            vec![Label::from_letter('C').unwrap()],
        );
        assert_eq!(
            ConsoleFormatter::extracted_ranking(&ranking, &map),
            "1. Response C"
        );
    }

    #[test]
    fn test_conversation_list() {
        no_color();
        assert_eq!(
            ConsoleFormatter::format_conversation_list(&[]),
            "No saved conversations.\n"
        );
        let mut conversation = Conversation::new("c-1", "2026-01-01T00:00:00Z");
        conversation.set_title("Rust Basics");
        let listing = ConsoleFormatter::format_conversation_list(&[conversation.summary()]);
        assert!(listing.contains("c-1  Rust Basics  (0 messages)"));
    }
}
