//! Output formatter trait

use council_domain::{CouncilResult, OutputFormat};

/// Trait for formatting council results
pub trait OutputFormatter {
    /// Format every stage of the result
    fn format(&self, question: &str, result: &CouncilResult) -> String;

    /// Format as JSON
    fn format_json(&self, question: &str, result: &CouncilResult) -> String;

    /// Format synthesis only (concise output)
    fn format_synthesis_only(&self, result: &CouncilResult) -> String;

    /// Dispatch on the configured format
    fn render(&self, format: OutputFormat, question: &str, result: &CouncilResult) -> String {
        match format {
            OutputFormat::Full => self.format(question, result),
            OutputFormat::Synthesis => self.format_synthesis_only(result),
            OutputFormat::Json => self.format_json(question, result),
        }
    }
}
