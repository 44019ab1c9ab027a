//! Prompt templates for the council stages

use crate::council::label::Label;
use crate::council::ranking::FINAL_RANKING_MARKER;
use crate::orchestration::value_objects::{AggregateEntry, PanelAnswer, PeerRanking};
use std::fmt::Write;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Stage 1 system directive
    pub const RESPONSE_SYSTEM: &'static str = r#"You are one member of a panel of expert assistants. Answer the user's question as well as it can be answered.

HOW TO ANSWER:
- Commit to a position. If the answer depends on something, say what it depends on and then decide.
- Be concrete: specific steps, numbers, names, trade-offs. Prefer what can be acted on today.
- Assume the reader is capable. Skip filler, disclaimers and restating the question.
- If an idea is bad, say so plainly and explain why.
- If you do not know something, say so in one sentence and move on.

Your answer will be critiqued and ranked by the other panel members, anonymously, against their own answers."#;

    /// Stage 2 system directive
    pub const RANKING_SYSTEM: &'static str = r#"You are a strict evaluator. Several anonymous answers to the same question follow. Decide which are best and explain exactly why.

JUDGE ON:
1. Specificity: concrete detail versus generic advice.
2. Depth: real expertise versus surface-level restatement.
3. Decisiveness: clear recommendations versus endless hedging.
4. Usefulness: could someone act on it today?
5. Insight: does it notice what the others missed?
6. Honesty: does it admit real limitations?

Do not be diplomatic and do not award ties. Some answers are better than others; your ranking decides which one the user sees first."#;

    /// Stage 3 system directive
    pub const SYNTHESIS_SYSTEM: &'static str = r#"You chair a panel of expert assistants. Each member answered the user's question, then the members ranked each other's answers anonymously.

YOUR JOB is to write one definitive answer that is better than any individual answer:
1. Keep the strongest, most distinctive insight from each answer.
2. Where answers contradict each other, decide which is right.
3. Fill gaps that every answer missed.
4. Drop repetition and filler.
5. Structure the result so it is easy to act on.

Use the peer rankings as evidence of quality, not as a vote you must follow. Do not summarize who said what, and do not hedge more than the best individual answer did."#;

    /// Stage 2 user prompt embedding every anonymized answer
    pub fn ranking_prompt(question: &str, labeled: &[(Label, &PanelAnswer)]) -> String {
        let responses = labeled
            .iter()
            .map(|(label, answer)| {
                format!("**{}:**\n\n{}", label.to_string().to_uppercase(), answer.text)
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let example = ["X", "Y", "Z", "W"]
            .iter()
            .take(labeled.len().max(2))
            .enumerate()
            .map(|(i, letter)| format!("{}. Response {}", i + 1, letter))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"ORIGINAL QUESTION:
{question}

---

RESPONSES TO EVALUATE:

{responses}

---

YOUR TASK:

1. EVALUATE EACH RESPONSE. For every response state:
   - what is strong (concrete insight, actionable advice, original thinking)
   - what is weak (vague or obvious points, hedging, missing the point)
   - what is missing (gaps, blind spots, angles nobody considered)

2. COMPARE DIRECTLY. Which response would you actually use if this were your problem?

3. RANK from best to worst. No ties. Every response appears exactly once.

End your reply with the ranking in exactly this format, one line per response ({count} lines):

{marker}
{example}"#,
            count = labeled.len(),
            marker = FINAL_RANKING_MARKER,
        )
    }

    /// Stage 3 user prompt: full answers, compressed rankings, consensus
    pub fn synthesis_prompt(
        question: &str,
        answers: &[PanelAnswer],
        rankings: &[PeerRanking],
        aggregate: &[AggregateEntry],
    ) -> String {
        let separator = "=".repeat(60);
        let responses = answers
            .iter()
            .map(|answer| format!("**{}:**\n\n{}", answer.model, answer.text))
            .collect::<Vec<_>>()
            .join(&format!("\n\n{separator}\n\n"));

        let mut prompt = format!(
            r#"ORIGINAL QUESTION:
{question}

---

STAGE 1 - INDIVIDUAL RESPONSES:

{responses}

---

STAGE 2 - HOW THE MEMBERS RANKED EACH OTHER:
{rankings}
"#,
            rankings = Self::rankings_summary(rankings),
        );

        if !aggregate.is_empty() {
            prompt.push('\n');
            prompt.push_str(&Self::aggregate_summary(aggregate));
        }

        let _ = write!(
            prompt,
            r#"
---

YOUR TASK AS CHAIRMAN:

{count} panel members answered and then evaluated each other. Deliver the definitive answer:
1. Extract the best unique insight from each response.
2. Resolve contradictions: decide who is right.
3. Fill the gaps everyone missed.
4. Cut filler and repetition.

Do not summarize the panel. Answer the question."#,
            count = answers.len(),
        );

        prompt
    }

    /// One line per peer that produced a usable ranking
    pub fn rankings_summary(rankings: &[PeerRanking]) -> String {
        let lines: Vec<String> = rankings
            .iter()
            .filter(|ranking| ranking.has_ranking())
            .map(|ranking| {
                let order = ranking
                    .parsed_order
                    .iter()
                    .map(Label::to_string)
                    .collect::<Vec<_>>()
                    .join(" > ");
                format!("- {} ranked: {}", ranking.model.short_name(), order)
            })
            .collect();

        if lines.is_empty() {
            "Rankings unavailable.".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Consensus block listing identities by average peer rank
    pub fn aggregate_summary(aggregate: &[AggregateEntry]) -> String {
        let mut block = String::from("AGGREGATE RANKING (by peer votes):\n");
        for (i, entry) in aggregate.iter().enumerate() {
            let _ = writeln!(
                block,
                "{}. {} (avg rank: {:.2})",
                i + 1,
                entry.model.short_name(),
                entry.average_rank
            );
        }
        block
    }

    /// One-shot prompt for a short conversation title
    pub fn title_prompt(question: &str) -> String {
        format!(
            r#"Generate a 3-5 word title for this question. No quotes, no punctuation. Just the title.

Question: {question}

Title:"#
        )
    }
}
