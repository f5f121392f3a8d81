//! Prompt construction for classification, role replies and RAG.

use std::collections::BTreeSet;
use voibot_core::conversation::Turn;
use voibot_core::message::Message;
use voibot_index::ScoredChunk;

/// The answer the grounded prompt asks for when the context has nothing useful.
pub const DONT_KNOW: &str = "I don't know.";

/// Instruction asking the model to emit exactly one label from `intents`.
pub fn classification(query: &str, role: &str, intents: &BTreeSet<String>) -> Vec<Message> {
    let labels = intents.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    let system = format!(
        "You are {role}. Classify the user's message into exactly one of these \
         categories: {labels}.\n\
         Reply with the category name only, with no punctuation or explanation."
    );
    vec![Message::system(system), Message::user(query)]
}

/// Free-form reply in character, told which intent the query was classified as.
pub fn role_reply(query: &str, intent: &str, role: &str) -> Vec<Message> {
    let system = format!(
        "You are {role}. The user's message was classified as '{intent}'. \
         Reply to it helpfully and concisely, staying in your role."
    );
    vec![Message::system(system), Message::user(query)]
}

/// Rewrite a follow-up question so it can be understood without the history.
pub fn condense_question(history: &[Turn], question: &str) -> Vec<Message> {
    let mut transcript = String::new();
    for turn in history {
        transcript.push_str(&format!("Human: {}\nAssistant: {}\n", turn.query, turn.response));
    }
    let prompt = format!(
        "Given the following conversation and a follow up question, rephrase the \
         follow up question to be a standalone question, in its original language.\n\n\
         Chat History:\n{transcript}\nFollow Up Input: {question}\nStandalone question:"
    );
    vec![Message::user(prompt)]
}

/// Answer from retrieved context, falling back to [`DONT_KNOW`].
pub fn grounded_answer(context: &[ScoredChunk<'_>], history: &[Turn], question: &str) -> Vec<Message> {
    let context = context
        .iter()
        .map(|hit| hit.chunk.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n");
    let system = format!(
        "Use the following pieces of context to answer the user's question. \
         If the context does not contain the answer, reply with exactly \"{DONT_KNOW}\" \
         and nothing else. Do not make up an answer.\n\n\
         ----------------\n{context}"
    );

    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(Message::system(system));
    for turn in history {
        messages.extend(turn.to_messages());
    }
    messages.push(Message::user(question));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use voibot_core::message::Role;
    use voibot_index::Chunk;

    #[test]
    fn classification_lists_every_intent() {
        let intents: BTreeSet<String> = ["greeting", "refund"].iter().map(|s| s.to_string()).collect();
        let messages = classification("hi there", "a support agent", &intents);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("a support agent"));
        assert!(messages[0].content.contains("greeting, refund"));
        assert_eq!(messages[1].content, "hi there");
    }

    #[test]
    fn condense_includes_transcript() {
        let history = vec![Turn::new("What is the refund window?", "30 days.")];
        let messages = condense_question(&history, "And for sale items?");
        assert!(messages[0].content.contains("Human: What is the refund window?"));
        assert!(messages[0].content.contains("Follow Up Input: And for sale items?"));
    }

    #[test]
    fn grounded_answer_carries_context_and_history() {
        let chunk = Chunk {
            source: "policy.pdf".into(),
            page: 2,
            index: 0,
            text: "Refunds are issued within 30 days.".into(),
        };
        let hits = [ScoredChunk { chunk: &chunk, score: 0.9 }];
        let history = vec![Turn::new("hello", "Hi!")];

        let messages = grounded_answer(&hits, &history, "How long do refunds take?");

        assert_eq!(messages.len(), 4);
        assert!(messages[0].content.contains("within 30 days"));
        assert!(messages[0].content.contains(DONT_KNOW));
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].content, "How long do refunds take?");
    }
}
