//! Stage 1 message context construction

use super::entities::{ConversationTurn, TurnRole};
use super::message::Message;

/// Build the ordered message sequence sent to every panel member in Stage 1.
///
/// The sequence is: the system directive, each prior turn (user turns
/// verbatim, assistant turns replaced by their synthesized answer or
/// omitted when none is attached), then the current query.
pub fn build_conversation_context(
    system_directive: &str,
    history: &[ConversationTurn],
    query: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_directive));

    for turn in history {
        match turn.role {
            TurnRole::User => messages.push(Message::user(turn.content.as_str())),
            TurnRole::Assistant => {
                if let Some(answer) = &turn.synthesized_answer {
                    messages.push(Message::assistant(answer.text.as_str()));
                }
            }
        }
    }

    messages.push(Message::user(query));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;
    use crate::conversation::message::Role;
    use crate::orchestration::value_objects::ChairmanResult;

    fn assistant_turn(raw: &str, synthesized: Option<&str>) -> ConversationTurn {
        ConversationTurn {
            role: TurnRole::Assistant,
            content: raw.to_string(),
            synthesized_answer: synthesized
                .map(|text| ChairmanResult::success(Model::new("chair/model"), text)),
        }
    }

    #[test]
    fn test_empty_history() {
        let messages = build_conversation_context("SYSTEM", &[], "What now?");
        assert_eq!(
            messages,
            vec![Message::system("SYSTEM"), Message::user("What now?")]
        );
    }

    #[test]
    fn test_assistant_turn_replays_synthesized_answer() {
        let history = vec![
            ConversationTurn::user("First question"),
            assistant_turn("raw panel text", Some("chairman answer")),
        ];
        let messages = build_conversation_context("SYSTEM", &history, "Follow-up");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], Message::user("First question"));
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "chairman answer");
        assert_eq!(messages[3], Message::user("Follow-up"));
    }

    #[test]
    fn test_assistant_turn_without_synthesis_is_omitted() {
        let history = vec![
            ConversationTurn::user("First question"),
            assistant_turn("All models failed", None),
        ];
        let messages = build_conversation_context("SYSTEM", &history, "Retry");

        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.role != Role::Assistant));
    }
}
